use criterion::{criterion_group, criterion_main, Criterion};
use ocho::{machine::Machine, resources::Rom};

static BASE_ROM: once_cell::sync::Lazy<Rom> = once_cell::sync::Lazy::new(build_rom);

/// A tight loop over the hot paths: index load, a five row draw, alu,
/// index add and a random byte, then back around.
fn build_rom() -> Rom {
    let opcodes: [u16; 8] = [
        0x6005, // V0 = 5
        0x6103, // V1 = 3
        0xA000, // I = 0
        0xD015, // draw 5 rows at (V0, V1)
        0x8014, // V0 += V1
        0xF11E, // I += V1
        0xC23F, // V2 = rand & 0x3F
        0x1204, // back to the index load
    ];
    let mut bytes = Vec::with_capacity(opcodes.len() * 2);
    for opcode in opcodes {
        bytes.extend_from_slice(&opcode.to_be_bytes());
    }
    Rom::new("BENCH", bytes).expect("the benchmark program fits the memory")
}

fn base_machine() -> Machine {
    Machine::new(&BASE_ROM)
}

pub fn step_bench(c: &mut Criterion) {
    c.bench_function("step_bench", |b| {
        let mut machine = base_machine();
        b.iter(|| {
            machine.step().expect("the benchmark program never faults");
        });
    });
}

pub fn print_bench(c: &mut Criterion) {
    let machine = base_machine();
    c.bench_function("print_bench", |b| {
        b.iter(|| {
            let _ = format!("{}", machine);
        });
    });
}

criterion_group!(benches, step_bench, print_bench);
criterion_main!(benches);
