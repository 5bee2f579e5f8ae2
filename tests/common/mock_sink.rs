//! Mock sink for checking call order and fault propagation

use mockall::mock;
use std::io;
use sysrules::Sink;

mock! {
    pub Downstream {}

    impl Sink for Downstream {
        fn write_bytes(&mut self, buf: &[u8]) -> io::Result<()>;
        fn flush(&mut self) -> io::Result<()>;
        fn close(&mut self) -> io::Result<()>;
    }
}

/// An error a mocked sink can return
pub fn broken_pipe(message: &str) -> io::Error {
    io::Error::new(io::ErrorKind::BrokenPipe, message.to_string())
}
