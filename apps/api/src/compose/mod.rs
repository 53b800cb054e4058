// Compose API: upload → layout provider → validation → compositor → PNG download.
// Decoding and compositing are CPU-bound and run inside tokio::task::spawn_blocking.

pub mod form;
pub mod handlers;
