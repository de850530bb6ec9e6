pub mod file;
pub mod user;

pub use file::{
    DownloadDescriptor, EditFileParams, FileEntry, FileInfo, FileMessage, FileParams,
    FileResponse, UploadFile,
};
pub use user::{
    AllUsers, DeleteResponse, LoginParams, LoginResponse, RegisterResponse, UserParams,
    UserResponse, UserSummary,
};
