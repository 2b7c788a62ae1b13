mod helpers;
mod login_test;
mod logout_test;
mod register_test;
mod verify_otp_test;
