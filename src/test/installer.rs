use std::net::Ipv4Addr;

use super::recording_stack::{RecordingStack, RouteCall};
use crate::net::NodeId;
use crate::route::{InterfaceBindings, install_path};
use crate::stack::InterfaceAddr;

fn ifa(if_index: u32, addr: [u8; 4]) -> InterfaceAddr {
    InterfaceAddr {
        if_index,
        addr: Ipv4Addr::from(addr),
    }
}

/// 0 - 1 - 2 链，两条链路分别用 10.0.0.0/30 和 10.0.1.0/30
fn chain_bindings() -> InterfaceBindings {
    let mut b = InterfaceBindings::default();
    b.bind_link(NodeId(0), NodeId(1), ifa(1, [10, 0, 0, 1]), ifa(1, [10, 0, 0, 2]));
    b.bind_link(NodeId(1), NodeId(2), ifa(2, [10, 0, 1, 1]), ifa(1, [10, 0, 1, 2]));
    b
}

#[test]
fn bindings_are_symmetric() {
    let b = chain_bindings();
    assert_eq!(b.len(), 4);

    let fwd = b.get(NodeId(0), NodeId(1)).expect("0->1");
    assert_eq!(fwd.if_index, 1);
    assert_eq!(fwd.next_hop, Ipv4Addr::new(10, 0, 0, 2));

    let rev = b.get(NodeId(1), NodeId(0)).expect("1->0");
    assert_eq!(rev.if_index, 1);
    assert_eq!(rev.next_hop, Ipv4Addr::new(10, 0, 0, 1));

    let fwd = b.get(NodeId(1), NodeId(2)).expect("1->2");
    assert_eq!(fwd.if_index, 2);
    assert_eq!(fwd.next_hop, Ipv4Addr::new(10, 0, 1, 2));

    assert!(b.get(NodeId(0), NodeId(2)).is_none());
}

#[test]
fn installs_host_route_on_every_hop() {
    let mut stack = RecordingStack::default();
    let dst = Ipv4Addr::new(10, 0, 1, 2);
    let path = [NodeId(0), NodeId(1), NodeId(2)];

    let report = install_path(&mut stack, &chain_bindings(), &path, dst);
    assert!(report.is_complete());
    assert_eq!(report.installed, 2);

    assert_eq!(
        stack.routes,
        vec![
            RouteCall {
                node: NodeId(0),
                dst,
                next_hop: Ipv4Addr::new(10, 0, 0, 2),
                if_index: 1,
            },
            RouteCall {
                node: NodeId(1),
                dst,
                next_hop: Ipv4Addr::new(10, 0, 1, 2),
                if_index: 2,
            },
        ]
    );
    // 终点不需要路由
    assert!(stack.routes_at(NodeId(2)).is_empty());
}

#[test]
fn missing_binding_skips_only_that_hop() {
    let mut stack = RecordingStack::default();
    let dst = Ipv4Addr::new(10, 0, 9, 2);
    // 1 -> 3 没有绑定
    let path = [NodeId(0), NodeId(1), NodeId(3)];

    let report = install_path(&mut stack, &chain_bindings(), &path, dst);
    assert!(!report.is_complete());
    assert_eq!(report.installed, 1);
    assert_eq!(report.skipped, vec![(NodeId(1), NodeId(3))]);
    assert_eq!(stack.routes.len(), 1);
    assert_eq!(stack.routes[0].node, NodeId(0));
}

#[test]
fn short_paths_install_nothing() {
    let mut stack = RecordingStack::default();
    let b = chain_bindings();
    let dst = Ipv4Addr::new(10, 0, 0, 2);

    assert_eq!(install_path(&mut stack, &b, &[], dst).installed, 0);
    assert_eq!(install_path(&mut stack, &b, &[NodeId(0)], dst).installed, 0);
    assert!(stack.routes.is_empty());
}
