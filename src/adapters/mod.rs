pub mod icinga;
pub mod zabbix;

pub use icinga::{CfgDirectorySource, NamePolicy};
pub use zabbix::ZabbixClient;
