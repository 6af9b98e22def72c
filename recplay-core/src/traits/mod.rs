pub mod session_observer;
pub mod stream_host;
