pub mod use_cases;

pub use use_cases::{
    change_password::{CHANGE_PASSWORD_FAILED_MESSAGE, ChangePasswordUseCase},
    forgot_password::ForgotPasswordUseCase,
    invite::InviteUseCase,
    login::{LoginUseCase, MISSING_CREDENTIALS_MESSAGE},
    register::RegisterUseCase,
};
