pub mod lockout;
pub mod login;
pub mod logout;
pub mod register;
pub mod verify_otp;
