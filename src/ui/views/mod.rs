pub mod backups;
pub mod deploy;
pub mod status;
