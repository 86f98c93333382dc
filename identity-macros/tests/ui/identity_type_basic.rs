use identity_domain::model::{IdentityType, identity_type};

#[identity_type]
struct Agent {
    vendor: Option<String>,
}

#[identity_type(debug = false)]
struct Device {
    serial: String,
}

impl std::fmt::Debug for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Device({})", self.key())
    }
}

fn main() {
    let mut agent = Agent::new("crawler".to_string());
    assert!(agent.is_enabled());
    assert_eq!(agent.key(), "crawler");
    agent.attributes_mut().add("scope", "read");
    agent.vendor = Some("acme".into());
    let _ = format!("{:?}", agent.clone());

    // 手写 Debug 可编译，说明未自动派生 Debug
    let device = Device::new("d-1".to_string());
    let _ = format!("{:?}", device);
    let _ = device.serial.len();
}
