pub mod domain_name;
pub mod motd_banner;
