use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use chrono::{Duration, NaiveDate};
use geo_types::{LineString, Polygon};
use oceanus_engine::config::EngineConfig;
use oceanus_engine::core::domain::{
    GeoPoint, IngestStats, LocationNode, MovementDataset, PingEvent, Vessel, Zone,
};
use oceanus_engine::core::filter::FilterContext;
use oceanus_engine::algorithms::suspicion;
use oceanus_engine::geometry::ZoneIndex;
use std::collections::HashMap;

fn ring(n: usize, cx: f64, cy: f64, r: f64) -> LineString<f64> {
    let mut coords: Vec<(f64, f64)> = (0..n)
        .map(|i| {
            let theta = (i as f64) * std::f64::consts::TAU / (n as f64);
            (cx + r * theta.cos(), cy + r * theta.sin())
        })
        .collect();
    coords.push(coords[0]);
    LineString::from(coords)
}

fn build_index() -> ZoneIndex {
    let zones = vec![
        Zone {
            name: "Ghoti Preserve".to_string(),
            kind: Some("Ecological Preserve".to_string()),
            geometry: Polygon::new(ring(64, 0.0, 0.0, 10.0), vec![ring(32, 0.0, 0.0, 2.0)]).into(),
        },
        Zone {
            name: "Nemo Reef".to_string(),
            kind: Some("Ecological Preserve".to_string()),
            geometry: Polygon::new(ring(128, 40.0, 40.0, 15.0), vec![]).into(),
        },
    ];
    ZoneIndex::build(&zones, &EngineConfig::default())
}

fn bench_first_match(c: &mut Criterion) {
    let index = build_index();
    let mut group = c.benchmark_group("containment");

    let cases = [
        ("inside", GeoPoint::new(5.0, 0.0)),
        ("in_hole", GeoPoint::new(0.5, 0.5)),
        ("bbox_miss", GeoPoint::new(200.0, 200.0)),
        ("second_zone", GeoPoint::new(40.0, 40.0)),
    ];

    for (label, point) in cases {
        group.bench_with_input(BenchmarkId::new("first_match", label), &point, |b, p| {
            b.iter(|| index.first_match(black_box(*p)));
        });
    }

    group.finish();
}

fn bench_aggregation_pass(c: &mut Criterion) {
    let index = build_index();

    let vessels: Vec<Vessel> = (0..20)
        .map(|i| Vessel {
            id: format!("v-{i}"),
            name: format!("Vessel {i}"),
            company: Some(format!("Company {}", i % 5)),
        })
        .collect();

    let location_nodes = vec![
        LocationNode { id: "in".to_string(), name: "Inside".to_string() },
        LocationNode { id: "out".to_string(), name: "Outside".to_string() },
    ];
    let mut points = HashMap::new();
    points.insert("Inside".to_string(), GeoPoint::new(5.0, 0.0));
    points.insert("Outside".to_string(), GeoPoint::new(100.0, 100.0));

    let base = NaiveDate::from_ymd_opt(2035, 2, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
        .and_utc();
    let pings: Vec<PingEvent> = (0..2000)
        .map(|i| PingEvent {
            location_id: if i % 3 == 0 { "in" } else { "out" }.to_string(),
            vessel_id: format!("v-{}", i % 20),
            time: base + Duration::minutes(i as i64 * 17),
        })
        .collect();

    let dataset = MovementDataset::assemble(
        vessels,
        pings,
        vec![],
        vec![],
        location_nodes,
        points,
        IngestStats::default(),
    );
    let filter = FilterContext::unscoped();

    c.bench_function("aggregate_2000_pings", |b| {
        b.iter(|| suspicion::aggregate(black_box(&dataset), &index, &filter));
    });
}

criterion_group!(benches, bench_first_match, bench_aggregation_pass);
criterion_main!(benches);
