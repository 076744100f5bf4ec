//! Shared constants used across the application

/// First assistant message when the service is configured.
pub const GREETING: &str = "Hello! I can assist you in finding answers about the course. Keep in mind I am not a tutor. For those types of questions you will need to ask your instructor.";

/// Shown in place of an answer whenever the completion call fails.
pub const SERVICE_ERROR_MESSAGE: &str =
    "Sorry, something went wrong while trying to answer your question. Please try again.";

/// Sole history entry when no credential is available at startup.
pub const CONFIGURATION_ERROR_MESSAGE: &str =
    "**Error:** API_KEY is not set. Please configure your environment.";

/// Environment variable holding the completion API key.
pub const API_KEY_ENV: &str = "API_KEY";

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Canned questions offered as shortcut buttons, in display order.
pub const PROMPT_SHORTCUTS: [&str; 5] = [
    "Instructor contact",
    "Course materials",
    "Attendance Verification Quiz",
    "Course schedule",
    "Proctoring requirements",
];
