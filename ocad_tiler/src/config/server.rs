use serde::Deserialize;

pub const DEFAULT_IP: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
	/// IP to bind to.
	pub ip: Option<String>,

	/// TCP port to bind to.
	pub port: Option<u16>,
}

impl ServerConfig {
	pub fn ip(&self) -> &str {
		self.ip.as_deref().unwrap_or(DEFAULT_IP)
	}

	pub fn port(&self) -> u16 {
		self.port.unwrap_or(DEFAULT_PORT)
	}

	pub fn override_optional_ip(&mut self, ip: Option<&str>) {
		if let Some(ip) = ip {
			self.ip = Some(ip.to_string());
		}
	}

	pub fn override_optional_port(&mut self, port: Option<u16>) {
		if port.is_some() {
			self.port = port;
		}
	}
}
