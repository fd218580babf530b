//! Authentication and authorization, grounded on a bearer-token
//! middleware pattern: hash/HMAC the credential, compare in constant
//! time, generalized to the several credential shapes authorization
//! requires.

pub mod authz;
pub mod hmac_auth;
pub mod principal;

pub use authz::{check_calendar_auth, check_team_admin, check_team_auth, check_user_auth};
pub use principal::{resolve_principal, Credentials};
