// Copyright 2025 the Signpost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use signpost_nav::guard::{AccessGuard, GuardRules};
use signpost_nav::intercept::decide;
use signpost_nav::location::{Location, Origin, resolve_href};
use signpost_nav::resolve::RouteResolver;
use signpost_nav::types::{Anchor, Principal, Role};

const PATHS: &[&str] = &[
    "/",
    "/about",
    "/services/seo",
    "/services/unknown",
    "/portfolio/acme-rebrand",
    "/blog/launch-day",
    "/blog/author/sara",
    "/login",
    "/dashboard/overview",
    "/dashboard/clients/42",
    "/portal/invoices",
    "/no/such/section",
];

const HREFS: &[&str] = &[
    "/pricing",
    "services/seo?ref=nav",
    "../blog/launch-day#comments",
    "https://agency.example/portal",
    "https://elsewhere.example/",
    "mailto:hello@agency.example",
    "#top",
];

fn locations() -> Vec<Location> {
    PATHS.iter().map(|p| Location::parse(p)).collect()
}

fn bench_resolve(c: &mut Criterion) {
    let resolver = RouteResolver::default();
    let locs = locations();
    let mut group = c.benchmark_group("resolve");
    group.throughput(Throughput::Elements(locs.len() as u64));
    group.bench_function("site_routes", |b| {
        b.iter(|| {
            for loc in &locs {
                black_box(resolver.resolve(black_box(loc)));
            }
        });
    });
    group.finish();
}

fn bench_guard(c: &mut Criterion) {
    let guard = AccessGuard::new(GuardRules::default());
    let locs = locations();
    let principals = [
        ("anonymous", Principal::anonymous()),
        ("operator", Principal::signed_in("op", Role::Operator)),
        ("customer", Principal::signed_in("c", Role::Customer)),
    ];
    let mut group = c.benchmark_group("guard");
    group.throughput(Throughput::Elements(locs.len() as u64));
    for (name, principal) in &principals {
        group.bench_function(*name, |b| {
            b.iter(|| {
                for loc in &locs {
                    black_box(guard.decide(principal, black_box(loc)));
                }
            });
        });
    }
    group.finish();
}

fn bench_intercept(c: &mut Criterion) {
    let Some(origin) = Origin::parse("https://agency.example") else {
        return;
    };
    let current = Location::parse("/services/web-design");
    let anchors: Vec<Anchor> = HREFS.iter().map(|h| Anchor::new(*h)).collect();
    let mut group = c.benchmark_group("intercept");
    group.throughput(Throughput::Elements(HREFS.len() as u64));
    group.bench_function("resolve_href", |b| {
        b.iter(|| {
            for href in HREFS {
                black_box(resolve_href(&origin, &current, black_box(href)));
            }
        });
    });
    group.bench_function("decide", |b| {
        b.iter(|| {
            for anchor in &anchors {
                black_box(decide(black_box(anchor), &origin, &current));
            }
        });
    });
    group.finish();
}

criterion_group!(benches, bench_resolve, bench_guard, bench_intercept);
criterion_main!(benches);
