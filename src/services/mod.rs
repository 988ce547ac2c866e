// linkfolio services
// Services handle configuration that lives outside the hierarchy itself.

pub mod settings_engine;
