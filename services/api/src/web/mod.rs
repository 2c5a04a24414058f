pub mod rest;
pub mod state;

// Re-export the handlers to make them easily accessible to the binary that
// builds the web server router.
pub use rest::{
    generate_morning_routine_handler, generate_schedule_handler, health_handler,
    sleep_assistant_handler,
};
