//! Application Layer
//!
//! Use cases orchestrating the domain.

pub mod config;
pub mod obtain_token;
pub mod profile;
pub mod sign_up;
pub mod user_admin;

pub use config::AuthConfig;
pub use obtain_token::{ObtainTokenInput, ObtainTokenOutput, ObtainTokenUseCase};
pub use profile::{SelfProfileUseCase, UpdateProfileInput};
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use user_admin::{CreateUserInput, UpdateUserInput, UserAdminUseCase};
