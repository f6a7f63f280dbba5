mod config_validation;
mod domain_authenticator;
