// Jetpack
// Copyright (C) 2023 - Michael DeHaan <michael@michaeldehaan.net> + contributors
// Copyright (C) 2025 - Riff.CC <https://riff.cc>
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// long with this program.  If not, see <http://www.gnu.org/licenses/>.

//! A device that answers facts requests from a YAML fixture instead of a CLI session.
//!
//! ```yaml
//! hostname: ios01
//! version: 15.6(2)T
//! filesystems: ["flash0:", "nvram:"]
//! memtotal_mb: 1842
//! memfree_mb: 1203
//! config: |
//!   hostname ios01
//! interfaces:
//!   GigabitEthernet0/0:
//!     ipv4: ["192.0.2.1/24"]
//! ```

use crate::error::{ErrorContext, NetfactsError, Result};
use crate::facts::gatherer::FactsGatherer;
use crate::facts::result::*;
use crate::facts::subset::{resolve_subsets, subset_names, GatherSubset};
use crate::util::io::read_local_file;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::path::Path;

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceFixture {
    pub hostname: String,
    pub version: String,
    pub model: Option<String>,
    pub serialnum: Option<String>,
    #[serde(default)]
    pub filesystems: Vec<String>,
    pub memtotal_mb: i64,
    pub memfree_mb: i64,
    #[serde(default)]
    pub config: String,
    #[serde(default)]
    pub interfaces: IndexMap<String, InterfaceFixture>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct InterfaceFixture {
    pub description: Option<String>,
    pub macaddress: Option<String>,
    pub mtu: Option<u32>,
    pub operstatus: Option<String>,
    /// addresses in address/prefix form
    #[serde(default)]
    pub ipv4: Vec<String>,
    #[serde(default)]
    pub ipv6: Vec<String>,
}

pub struct MockDevice {
    fixture: DeviceFixture,
}

impl MockDevice {

    pub fn new(fixture: DeviceFixture) -> Self {
        Self { fixture }
    }

    pub fn from_fixture(path: &Path) -> Result<Self> {
        let contents = read_local_file(path).context("loading device fixture")?;
        let fixture: DeviceFixture = serde_yaml::from_str(&contents).map_err(|e| {
            NetfactsError::Config(format!("invalid device fixture {}: {}", path.display(), e))
        })?;
        Ok(Self::new(fixture))
    }

    pub fn fixture(&self) -> &DeviceFixture {
        &self.fixture
    }

    fn baseline_facts(&self, facts: &mut Map<String, Value>) {
        let f = &self.fixture;
        facts.insert(HOSTNAME_KEY.into(), json!(f.hostname));
        facts.insert(VERSION_KEY.into(), json!(f.version));
        facts.insert(MODEL_KEY.into(), json!(f.model));
        facts.insert(SERIALNUM_KEY.into(), json!(f.serialnum));
    }

    fn subset_facts(&self, subset: GatherSubset, facts: &mut Map<String, Value>) {
        let f = &self.fixture;
        match subset {
            GatherSubset::Hardware => {
                facts.insert(FILESYSTEMS_KEY.into(), json!(f.filesystems));
                facts.insert(MEMTOTAL_KEY.into(), json!(f.memtotal_mb));
                facts.insert(MEMFREE_KEY.into(), json!(f.memfree_mb));
            },
            GatherSubset::Config => {
                facts.insert(CONFIG_KEY.into(), json!(f.config));
            },
            GatherSubset::Interfaces => {
                let mut interfaces = Map::new();
                let mut all_ipv4: Vec<String> = Vec::new();
                let mut all_ipv6: Vec<String> = Vec::new();
                for (name, intf) in f.interfaces.iter() {
                    let ipv4: Vec<Value> = intf.ipv4.iter().map(|a| address_entry(a, &mut all_ipv4)).collect();
                    let ipv6: Vec<Value> = intf.ipv6.iter().map(|a| address_entry(a, &mut all_ipv6)).collect();
                    interfaces.insert(name.clone(), json!({
                        "description": intf.description,
                        "macaddress": intf.macaddress,
                        "mtu": intf.mtu,
                        "operstatus": intf.operstatus,
                        "ipv4": ipv4,
                        "ipv6": ipv6,
                    }));
                }
                facts.insert(INTERFACES_KEY.into(), Value::Object(interfaces));
                facts.insert(IPV4_ADDRESSES_KEY.into(), json!(all_ipv4));
                facts.insert(IPV6_ADDRESSES_KEY.into(), json!(all_ipv6));
            },
        }
    }
}

// "192.0.2.1/24" -> {"address": "192.0.2.1", "subnet": "24"}, remembering the bare address
fn address_entry(cidr: &str, seen: &mut Vec<String>) -> Value {
    let (address, subnet) = match cidr.split_once('/') {
        Some((a, s)) => (a, Some(s)),
        None => (cidr, None),
    };
    seen.push(address.to_string());
    json!({ "address": address, "subnet": subnet })
}

impl Default for MockDevice {
    fn default() -> Self {
        let mut interfaces = IndexMap::new();
        interfaces.insert(String::from("GigabitEthernet0/0"), InterfaceFixture {
            description: Some(String::from("uplink")),
            macaddress: Some(String::from("5254.0012.3456")),
            mtu: Some(1500),
            operstatus: Some(String::from("up")),
            ipv4: vec![String::from("192.0.2.1/24")],
            ipv6: vec![String::from("2001:db8::1/64")],
        });
        interfaces.insert(String::from("Loopback0"), InterfaceFixture {
            mtu: Some(1514),
            operstatus: Some(String::from("up")),
            ipv4: vec![String::from("198.51.100.1/32")],
            ..InterfaceFixture::default()
        });
        Self::new(DeviceFixture {
            hostname: String::from("ios01"),
            version: String::from("15.6(2)T"),
            model: Some(String::from("IOSv")),
            serialnum: Some(String::from("9Q2QWXYZ0AB")),
            filesystems: vec![String::from("flash0:"), String::from("nvram:")],
            memtotal_mb: 1842,
            memfree_mb: 1203,
            config: String::from("hostname ios01\n!\ninterface GigabitEthernet0/0\n description uplink\n ip address 192.0.2.1 255.255.255.0\n!\nend\n"),
            interfaces,
        })
    }
}

impl FactsGatherer for MockDevice {

    fn name(&self) -> String {
        format!("mock:{}", self.fixture.hostname)
    }

    fn gather(&self, request: &FactsRequest) -> Result<FactsResult> {
        let subsets = resolve_subsets(&request.gather_subset)?;
        let mut facts = Map::new();
        self.baseline_facts(&mut facts);
        for subset in subsets.iter() {
            self.subset_facts(*subset, &mut facts);
        }
        facts.insert(GATHER_SUBSET_KEY.into(), json!(subset_names(&subsets)));
        Ok(FactsResult {
            changed: false,
            ansible_facts: facts,
        })
    }
}
