//! Error codes and validation messages the backend returns.

pub const INVALID_PHONE: &str = "phone must be a valid phone number";
pub const VERIFICATION_NOT_FOUND: &str = "verification_request_not_found";
pub const NON_JWT_TOKEN: &str = "token must be a jwt string";
pub const NON_JWT_REFRESH_TOKEN: &str = "refreshToken must be a jwt string";
pub const REFRESH_TOKEN_INVALID: &str = "refresh_token_is_not_valid";

pub const PHOTO_REQUIRED: &str = "photo_object_is_required";
pub const NON_IMAGE: &str = "non_image_uploading";
pub const NOT_YOUR_PHOTO: &str = "you_can_use_only_yours_photos";

pub const REGISTRATION_COMPLETED: &str = "registration_is_already_completed";
pub const NOT_YOUR_ACCOUNT: &str = "you_can_delete_only_your_account";
pub const PROFILE_NOT_FOUND: &str = "profile_not_found";

/// Registration fields, in the order they are validated.
pub const REGISTRATION_FIELDS: [&str; 3] = ["fullName", "gender", "preferredGender"];

pub fn must_be_string(field: &str) -> String {
    format!("{field} must be a string")
}

pub fn should_not_be_empty(field: &str) -> String {
    format!("{field} should not be empty")
}
