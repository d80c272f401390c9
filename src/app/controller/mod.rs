pub mod session_controllers;
