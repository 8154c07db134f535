use criterion::{black_box, criterion_group, criterion_main, Criterion};

use _rust::grid::batch::{geodetic_to_mgrs_batch, mgrs_to_geodetic_batch};
use _rust::grid::{Mgrs, Utm};
use _rust::proj::ellipsoid::WGS84;
use _rust::shp::Shapefile;

fn make_points(n: usize) -> Vec<(f64, f64)> {
    (0..n)
        .map(|i| {
            let t = i as f64 / n as f64;
            let lon = -179.0 + t * 358.0;
            let lat = -79.0 + ((i * 7919) % n) as f64 / n as f64 * 162.0;
            (lon.to_radians(), lat.to_radians())
        })
        .collect()
}

/// A polygon shapefile with `records` rings of `points` vertices each.
fn make_shapefile(records: usize, points: usize) -> Vec<u8> {
    let mut body = Vec::new();
    for r in 0..records {
        let mut content = Vec::new();
        content.extend_from_slice(&5i32.to_le_bytes());
        for v in [0.0f64, 0.0, 1.0, 1.0] {
            content.extend_from_slice(&v.to_le_bytes());
        }
        content.extend_from_slice(&1i32.to_le_bytes());
        content.extend_from_slice(&(points as i32).to_le_bytes());
        content.extend_from_slice(&0i32.to_le_bytes());
        for p in 0..points {
            let a = p as f64 / points as f64 * std::f64::consts::TAU;
            content.extend_from_slice(&(r as f64 + a.cos()).to_le_bytes());
            content.extend_from_slice(&a.sin().to_le_bytes());
        }
        body.extend_from_slice(&(r as i32 + 1).to_be_bytes());
        body.extend_from_slice(&((content.len() / 2) as i32).to_be_bytes());
        body.extend_from_slice(&content);
    }

    let mut out = Vec::with_capacity(100 + body.len());
    out.extend_from_slice(&9994i32.to_be_bytes());
    out.extend_from_slice(&[0u8; 20]);
    out.extend_from_slice(&(((100 + body.len()) / 2) as i32).to_be_bytes());
    out.extend_from_slice(&1000i32.to_le_bytes());
    out.extend_from_slice(&5i32.to_le_bytes());
    out.extend_from_slice(&[0u8; 64]);
    out.extend_from_slice(&body);
    out
}

fn bench_mgrs_forward(c: &mut Criterion) {
    let mgrs = Mgrs::new(WGS84).unwrap();
    let points = make_points(100_000);

    c.bench_function("mgrs_forward_serial_100k", |b| {
        b.iter(|| {
            for &(lon, lat) in &points {
                black_box(mgrs.geodetic_to_mgrs(lon, lat, 5).ok());
            }
        });
    });

    c.bench_function("mgrs_forward_parallel_100k", |b| {
        b.iter(|| black_box(geodetic_to_mgrs_batch(&mgrs, &points, 5)));
    });
}

fn bench_mgrs_inverse(c: &mut Criterion) {
    let mgrs = Mgrs::new(WGS84).unwrap();
    let refs: Vec<String> = geodetic_to_mgrs_batch(&mgrs, &make_points(100_000), 5)
        .into_iter()
        .filter_map(|r| r.ok().map(|m| m.to_string()))
        .collect();

    c.bench_function("mgrs_inverse_parallel_100k", |b| {
        b.iter(|| black_box(mgrs_to_geodetic_batch(&mgrs, &refs)));
    });
}

fn bench_utm_thread_scaling(c: &mut Criterion) {
    let utm = Utm::new(WGS84).unwrap();
    let points = make_points(200_000);

    for &threads in &[1, 2, 4, 8] {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .unwrap();

        c.bench_function(&format!("utm_forward_threads_{threads}_200k"), |b| {
            b.iter(|| {
                black_box(pool.install(|| _rust::grid::batch::geodetic_to_utm_batch(&utm, &points)))
            });
        });
    }
}

fn bench_shapefile_parse(c: &mut Criterion) {
    let bytes = make_shapefile(1_000, 256);

    c.bench_function("shapefile_parse_1000x256", |b| {
        b.iter(|| {
            let mut shp = Shapefile::from_bytes(bytes.clone());
            black_box(shp.parse().unwrap().len())
        });
    });

    let shp = Shapefile::from_bytes(bytes);
    c.bench_function("shapefile_get_shape_last_unparsed", |b| {
        b.iter(|| black_box(shp.get_shape(1_000).unwrap()));
    });
}

criterion_group!(
    benches,
    bench_mgrs_forward,
    bench_mgrs_inverse,
    bench_utm_thread_scaling,
    bench_shapefile_parse
);
criterion_main!(benches);
