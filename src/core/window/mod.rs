mod bounded_window;

pub use bounded_window::BoundedWindow;
