pub mod application_notifications;
