pub mod login_grant;
pub mod session;
