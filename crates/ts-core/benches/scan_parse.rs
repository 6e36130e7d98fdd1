//! Criterion benchmarks for hot-path parsing in `ts-core`.
//!
//! These benchmarks feed synthetic `ps aux` output so they run
//! deterministically in CI and on developer machines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ts_core::command::CommandBuilder;
use ts_core::config::TunnelDefinition;
use ts_core::scan::parse_process_table;

/// Build a process table with one sshuttle line every `tunnel_every` rows
/// (zero means no tunnel lines at all).
fn synthetic_ps_output(total_lines: usize, tunnel_every: usize) -> String {
    let mut out =
        String::from("USER PID %CPU %MEM VSZ RSS TTY STAT START TIME COMMAND\n");
    for i in 0..total_lines {
        if tunnel_every > 0 && i % tunnel_every == 0 {
            out.push_str(&format!(
                "root {} 0.1 0.2 12345 6789 ? Ss 10:01 0:00 /usr/bin/python3 /usr/bin/sshuttle -r deploy@host{}.example.net 10.0.0.0/8 --daemon\n",
                1000 + i,
                i
            ));
        } else {
            out.push_str(&format!(
                "user {} 0.0 0.1 8276 5204 pts/0 Ss 09:59 0:00 /usr/lib/firefox/firefox --tab {}\n",
                1000 + i,
                i
            ));
        }
    }
    out
}

fn bench_parse_process_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_parse");

    for (name, lines) in [("small_50", 50), ("medium_500", 500), ("large_2000", 2000)] {
        let output = synthetic_ps_output(lines, 25);
        group.bench_with_input(
            BenchmarkId::new("parse_process_table", name),
            &output,
            |b, input| {
                b.iter(|| {
                    let sessions = parse_process_table(black_box(input));
                    black_box(sessions);
                });
            },
        );
    }

    // The common case: a full process table with nothing to report.
    let quiet = synthetic_ps_output(2000, 0);
    group.bench_with_input(
        BenchmarkId::new("parse_process_table", "no_matches_2000"),
        &quiet,
        |b, input| {
            b.iter(|| {
                let sessions = parse_process_table(black_box(input));
                black_box(sessions);
            });
        },
    );

    group.finish();
}

fn bench_command_build(c: &mut Criterion) {
    let tunnel = TunnelDefinition {
        name: "prod".to_string(),
        host: "bastion.example.net".to_string(),
        user: "deploy".to_string(),
        subnets: vec![
            "10.0.0.0/8".to_string(),
            "172.16.0.0/12".to_string(),
            "192.168.0.0/16".to_string(),
        ],
        extra_args: "-i ~/.ssh/key.pem --dns".to_string(),
    };
    let builder = CommandBuilder::new(false);

    c.bench_function("scan_parse/command_build_with_key", |b| {
        b.iter(|| {
            let cmd = builder.build(black_box(&tunnel));
            black_box(cmd);
        })
    });
}

criterion_group!(benches, bench_parse_process_table, bench_command_build);
criterion_main!(benches);
