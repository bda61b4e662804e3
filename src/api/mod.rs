pub mod config_dto;
pub mod inventory_dto;
