pub mod certify;
pub mod enforce;
pub mod gate;
pub mod rules;
pub mod verify;
