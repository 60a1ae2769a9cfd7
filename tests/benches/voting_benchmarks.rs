//! # Voting Benchmarks
//!
//! | Operation | Target |
//! |-----------|--------|
//! | cast_vote, uncontended | < 50µs |
//! | cast_vote, 64 tasks on one proposal | linear in tasks |
//! | record encode/decode | < 5µs |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use dao_voting::domain::{decode, encode};
use dao_voting::{Proposal, VotingApi};
use dao_voting_tests::integration::fixtures::{principal, proposal_request, Dao};
use shared_types::Principal;
use std::time::Duration;
use tokio::runtime::Runtime;

fn bench_cast_vote(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("cast-vote");
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("uncontended", |b| {
        let dao = Dao::new();
        let creator = principal(u32::MAX);
        let proposal = rt
            .block_on(
                dao.service
                    .create_proposal(creator, proposal_request(1, -10, 1_000_000)),
            )
            .expect("create");
        let mut next = 0u32;
        b.iter(|| {
            let (voter, tokens) = dao.voter(next, 1);
            next += 1;
            rt.block_on(dao.service.cast_vote(proposal, voter, tokens, vec![1]))
                .expect("vote")
        })
    });

    for tasks in [8u32, 64] {
        group.throughput(Throughput::Elements(u64::from(tasks)));
        group.bench_with_input(BenchmarkId::new("same_proposal", tasks), &tasks, |b, &tasks| {
            b.iter(|| {
                let dao = Dao::new();
                let creator = principal(u32::MAX);
                rt.block_on(async {
                    let proposal = dao
                        .service
                        .create_proposal(creator, proposal_request(1, -10, 1_000))
                        .await
                        .expect("create");
                    let handles: Vec<_> = (0..tasks)
                        .map(|i| {
                            let (voter, tokens) = dao.voter(i, 1);
                            let service = dao.service.clone();
                            tokio::spawn(async move {
                                service.cast_vote(proposal, voter, tokens, vec![0]).await
                            })
                        })
                        .collect();
                    for handle in handles {
                        handle.await.expect("join").expect("vote");
                    }
                })
            })
        });
    }

    group.finish();
}

fn bench_record_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("record-codec");
    let proposal = Proposal::new(
        Principal::new([7; 32]),
        1,
        "x".repeat(300),
        0,
        3_600,
    );
    let bytes = encode(&proposal).expect("encode");

    group.bench_function("encode_proposal", |b| {
        b.iter(|| encode(black_box(&proposal)).expect("encode"))
    });
    group.bench_function("decode_proposal", |b| {
        b.iter(|| decode::<Proposal>(black_box(&bytes)).expect("decode"))
    });

    group.finish();
}

criterion_group!(benches, bench_cast_vote, bench_record_codec);
criterion_main!(benches);
