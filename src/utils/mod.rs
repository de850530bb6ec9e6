pub mod password;
pub mod s3;
pub mod storage;
pub mod validation;
