pub mod locator;
pub mod storage;
