pub mod checksum;
pub mod layout;
pub mod view;
