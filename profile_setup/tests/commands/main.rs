mod helpers;
mod upload_profile;
