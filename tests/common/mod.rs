#![allow(dead_code)]

pub mod mock_sink;
pub mod test_util;
