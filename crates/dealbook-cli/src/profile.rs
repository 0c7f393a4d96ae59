//! A small profile record. Its argument types are checked where it is built,
//! by clap on the command line.

#[derive(Debug, Clone)]
pub struct UserProfile {
  pub tab_number: i64,
  pub username:   String,
}

/// Describe `profile` in one sentence.
pub fn describe(profile: &UserProfile) -> String {
  format!(
    "User's username is {}, and his tab_number is {}",
    profile.username, profile.tab_number
  )
}
