use pnet::datalink::NetworkInterface;
use pnet::ipnetwork::{IpNetwork, Ipv4Network};

pub trait NetworkInterfaceExtension {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network>;
    /// The adapter's first IPv4 network, in the order the OS reports them.
    fn first_ipv4_net(&self) -> Option<Ipv4Network>;
    fn has_private_ipv4(&self) -> bool;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_nets(&self) -> Vec<Ipv4Network> {
        self.ips
            .iter()
            .filter_map(|ip| {
                if let IpNetwork::V4(ipv4) = ip {
                    Some(*ipv4)
                } else {
                    None
                }
            })
            .collect()
    }

    fn first_ipv4_net(&self) -> Option<Ipv4Network> {
        self.get_ipv4_nets().into_iter().next()
    }

    fn has_private_ipv4(&self) -> bool {
        self.get_ipv4_nets().iter().any(|net| net.ip().is_private())
    }
}
