pub mod dcf;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;
