use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use std::hint::black_box;
use zkagg_primitives::{G, Keypair, ProofId, encrypt_value, random_scalar};
use zkagg_proofs::{DhTuple, DhTupleProof, DiscreteLogProof, RangeProof, RangeStatement};

fn bench_dlog_verify(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
    let x = random_scalar(&mut rng);
    let y = x * G;
    let pid = ProofId::element(0, 0);
    let proof = DiscreteLogProof::generate(&x, &y, &pid, &mut rng);

    let mut g = c.benchmark_group("verify_discrete_log");
    g.throughput(Throughput::Elements(1));
    g.bench_function(BenchmarkId::from_parameter("schnorr"), |b| {
        b.iter(|| black_box(proof.verify(&y, &pid)));
    });
    g.finish();
}

fn bench_dh_tuple_verify(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([8u8; 32]);
    let w = random_scalar(&mut rng);
    let h = random_scalar(&mut rng) * G;
    let tuple = DhTuple { g: G, h, u: w * G, v: w * h };
    let pid = ProofId::element(0, 0);
    let proof = DhTupleProof::generate(&tuple, &w, &pid, &mut rng);

    let mut g = c.benchmark_group("verify_dh_tuple");
    g.throughput(Throughput::Elements(1));
    g.bench_function(BenchmarkId::from_parameter("chaum_pedersen"), |b| {
        b.iter(|| black_box(proof.verify(&tuple, &pid)));
    });
    g.finish();
}

fn bench_range_verify(c: &mut Criterion) {
    let mut rng = ChaCha20Rng::from_seed([9u8; 32]);
    let kp = Keypair::generate(&mut rng);

    let mut g = c.benchmark_group("verify_range");
    g.throughput(Throughput::Elements(1));
    for bound in [16u64, 1 << 16, 1 << 32] {
        let value = bound - 1;
        let r = random_scalar(&mut rng);
        let stmt = RangeStatement {
            ciphertext: encrypt_value(&kp.public, &r, value),
            public_key: kp.public,
            bound,
        };
        let pid = ProofId::sum(0);
        let proof =
            RangeProof::generate(&stmt, value, &r, &pid, &mut rng).expect("value below bound");
        g.bench_with_input(BenchmarkId::from_parameter(bound), &proof, |b, proof| {
            b.iter(|| black_box(proof.verify(&stmt, &pid)));
        });
    }
    g.finish();
}

criterion_group!(benches, bench_dlog_verify, bench_dh_tuple_verify, bench_range_verify);
criterion_main!(benches);
