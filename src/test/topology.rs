use crate::Error;
use crate::net::NodeId;
use crate::topo::{
    DEFAULT_DATA_RATE_BPS, DEFAULT_DELAY_MS, MIN_DATA_RATE_BPS, load_demands, load_links,
    parse_demands, parse_links,
};
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

const LINK_HEADER: &str = "srcId,dstId,srcName,dstName,delayMs,dataRateBps,packetLossRate,distanceKm\n";
const DEMAND_HEADER: &str =
    "demandId,srcNode,dstNode,srcId,dstId,dataRateMbps,startTimeSec,durationSec\n";

fn temp_file(name: &str, contents: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "starlink-sim-topo-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

#[test]
fn links_parse_names_and_node_count() {
    let csv = format!("{LINK_HEADER}0,1,SAT-0,SAT-1,2.5,50000000,0.01,1200.5\n3,1,SAT-3,SAT-1,4,1e6\n");
    let topo = parse_links(csv.as_bytes()).expect("parse");

    assert_eq!(topo.links.len(), 2);
    assert_eq!(topo.node_count(), 4);
    assert_eq!(topo.node_name(NodeId(3)), "SAT-3");
    // 2 号节点从未出现过
    assert_eq!(topo.node_name(NodeId(2)), "Node_2");

    let l0 = &topo.links[0];
    assert_eq!(l0.delay_ms, 2.5);
    assert_eq!(l0.data_rate_bps, 50_000_000);
    assert_eq!(l0.packet_loss_rate, 0.01);
    assert_eq!(l0.distance_km, 1200.5);

    let l1 = &topo.links[1];
    assert_eq!(l1.packet_loss_rate, 0.0);
    assert_eq!(l1.distance_km, 0.0);
    assert_eq!(l1.data_rate_bps, 1_000_000);
}

#[test]
fn links_clamp_delay_and_rate() {
    let csv = format!(
        "{LINK_HEADER}0,1,A,B,0,500\n1,2,B,C,-3,999\n2,3,C,D,0.2,1000\n3,4,D,E,10,-5\n4,5,E,F,10,-2.5e3\n"
    );
    let topo = parse_links(csv.as_bytes()).expect("parse");
    assert_eq!(topo.links.len(), 5);

    assert_eq!(topo.links[0].delay_ms, DEFAULT_DELAY_MS);
    assert_eq!(topo.links[0].data_rate_bps, DEFAULT_DATA_RATE_BPS);
    assert_eq!(topo.links[1].delay_ms, DEFAULT_DELAY_MS);
    assert_eq!(topo.links[1].data_rate_bps, DEFAULT_DATA_RATE_BPS);
    assert_eq!(topo.links[2].delay_ms, 0.2);
    assert_eq!(topo.links[2].data_rate_bps, MIN_DATA_RATE_BPS);
    // 负速率同样修正，不丢弃整行
    assert_eq!(topo.links[3].data_rate_bps, DEFAULT_DATA_RATE_BPS);
    assert_eq!(topo.links[4].data_rate_bps, DEFAULT_DATA_RATE_BPS);

    for l in &topo.links {
        assert!(l.delay_ms > 0.0);
        assert!(l.data_rate_bps >= MIN_DATA_RATE_BPS);
    }
}

#[test]
fn links_accept_float_formatted_rates() {
    let csv = format!("{LINK_HEADER}0,1,A,B,1.0,50000000.0\n");
    let topo = parse_links(csv.as_bytes()).expect("parse");
    assert_eq!(topo.links[0].data_rate_bps, 50_000_000);
}

#[test]
fn malformed_link_rows_are_skipped() {
    let csv = format!(
        "{LINK_HEADER}\
         0,1,A,B,1.0,1000000\n\
         x,2,B,C,1.0,1000000\n\
         1,2,B,C\n\
         \n\
         1,2,B,C,fast,1000000\n\
         1,2,B,C,1.0,1000000,lossy\n\
         2,3,C,D,1.0,1000000,,\n\
         3,4,D,E , 1.0 ,1000000,0,0,extra\n"
    );
    let topo = parse_links(csv.as_bytes()).expect("parse");
    let pairs: Vec<_> = topo.links.iter().map(|l| (l.src.0, l.dst.0)).collect();
    assert_eq!(pairs, vec![(0, 1), (2, 3), (3, 4)]);
    assert_eq!(topo.links[2].dst_name, "E");
}

#[test]
fn last_name_for_a_node_wins() {
    let csv = format!("{LINK_HEADER}0,1,OLD,B,1,1000000\n0,2,NEW,C,1,1000000\n");
    let topo = parse_links(csv.as_bytes()).expect("parse");
    assert_eq!(topo.node_name(NodeId(0)), "NEW");
}

#[test]
fn loss_injection_only_strictly_inside_unit_interval() {
    let csv = format!(
        "{LINK_HEADER}0,1,A,B,1,1000000,0\n0,1,A,B,1,1000000,0.25\n0,1,A,B,1,1000000,1\n0,1,A,B,1,1000000,-0.5\n"
    );
    let topo = parse_links(csv.as_bytes()).expect("parse");
    let inj: Vec<_> = topo.links.iter().map(|l| l.loss_injection()).collect();
    assert_eq!(inj, vec![None, Some(0.25), None, None]);
}

#[test]
fn graph_is_undirected_with_delay_weights() {
    let csv = format!("{LINK_HEADER}0,1,A,B,3,1000000\n1,2,B,C,4,1000000\n");
    let g = parse_links(csv.as_bytes()).expect("parse").graph();
    assert_eq!(g.node_count(), 3);
    assert_eq!(g.neighbors(NodeId(0)), &[(NodeId(1), 3.0)]);
    assert_eq!(g.neighbors(NodeId(1)), &[(NodeId(0), 3.0), (NodeId(2), 4.0)]);
    assert!(g.neighbors(NodeId(9)).is_empty());
}

#[test]
fn load_links_fails_on_missing_file_and_on_zero_links() {
    let missing = std::env::temp_dir().join("starlink-sim-definitely-missing.csv");
    assert!(matches!(load_links(&missing), Err(Error::Io { .. })));

    let only_header = temp_file("links.csv", LINK_HEADER);
    assert!(matches!(load_links(&only_header), Err(Error::NoLinks { .. })));

    let all_bad = temp_file("links.csv", &format!("{LINK_HEADER}a,b,c,d,e,f\n"));
    assert!(matches!(load_links(&all_bad), Err(Error::NoLinks { .. })));
}

#[test]
fn demands_parse_without_clamping() {
    let csv = format!(
        "{DEMAND_HEADER}0,SAT-0,SAT-2,0,2,1.5,1.0,2.0\n1,SAT-1,SAT-0,1,0,0,0,0\n2,bad,row,1\n"
    );
    let demands = parse_demands(csv.as_bytes()).expect("parse");
    assert_eq!(demands.len(), 2);

    let d = &demands[0];
    assert_eq!(d.demand_id, 0);
    assert_eq!(d.flow_id(), 1);
    assert_eq!((d.src, d.dst), (NodeId(0), NodeId(2)));
    assert_eq!(d.src_node, "SAT-0");
    assert_eq!(d.data_rate_bps(), 1_500_000);
    assert_eq!(d.start().as_secs_f64(), 1.0);
    assert_eq!(d.stop().as_secs_f64(), 3.0);

    assert_eq!(demands[1].data_rate_bps(), 0);
}

#[test]
fn load_demands_fails_on_zero_demands() {
    let path = temp_file("demands.csv", DEMAND_HEADER);
    assert!(matches!(load_demands(&path), Err(Error::NoDemands { .. })));
}

#[test]
fn negative_rate_link_still_carries_routes() {
    let csv = format!("{LINK_HEADER}0,1,A,B,10,-5\n1,2,B,C,10,1000000\n1,2,B,C,10,fast\n");
    let topo = parse_links(csv.as_bytes()).expect("parse");
    assert_eq!(topo.links.len(), 2);
    let path = crate::route::dijkstra(&topo.graph(), NodeId(0)).path_to(NodeId(2));
    assert_eq!(path, vec![NodeId(0), NodeId(1), NodeId(2)]);
}
