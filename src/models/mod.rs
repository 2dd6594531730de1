//! 数据模型

mod api;
mod directory;
mod user;

pub use api::*;
pub use directory::{Company, Event, Student};
pub use user::{
    CompanyProfile, CompanyProfileUpdate, Profile, ProfileUpdate, StudentProfile,
    StudentProfileUpdate, User, UserKind,
};
