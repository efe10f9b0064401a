use secrecy::Secret;

use palisade_core::{
    AuthFlowError, Email, NewUser, Password, PasswordHasher, UserRecord, UserStore,
    UserStoreError,
};

/// Register use case - administrative account creation.
///
/// Unlike the invitation flow this is not best-effort: the caller is an
/// authenticated operator and gets the real outcome, including the reason a
/// duplicate or malformed registration was rejected.
pub struct RegisterUseCase<U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: U,
    password_hasher: H,
}

impl<U, H> RegisterUseCase<U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    pub fn new(user_store: U, password_hasher: H) -> Self {
        Self {
            user_store,
            password_hasher,
        }
    }

    #[tracing::instrument(name = "RegisterUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        email: Secret<String>,
        password: Secret<String>,
    ) -> Result<UserRecord, AuthFlowError> {
        let email = Email::parse(email).map_err(|e| AuthFlowError::validation(e.to_string()))?;
        let password =
            Password::parse(password).map_err(|e| AuthFlowError::validation(e.to_string()))?;

        let password_hash = self
            .password_hasher
            .hash(password)
            .await
            .map_err(|e| AuthFlowError::operation(e.to_string()))?;

        match self
            .user_store
            .add_user(NewUser {
                email,
                password_hash,
            })
            .await
        {
            Ok(user) => Ok(user),
            Err(UserStoreError::UserAlreadyExists) => Err(AuthFlowError::validation(
                "An account with this email already exists.",
            )),
            Err(e) => Err(AuthFlowError::operation(e.to_string())),
        }
    }
}
