use clap::Parser;
use clap::ValueEnum;
use prime_hash::CollisionStrategy;
use prime_hash::HashTable;
use prime_hash::TableConfig;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Strategy {
    Chaining,
    DoubleHashing,
}

impl From<Strategy> for CollisionStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Chaining => CollisionStrategy::SeparateChaining,
            Strategy::DoubleHashing => CollisionStrategy::DoubleHashing,
        }
    }
}

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "target_capacity", default_value_t = 1000)]
    target_capacity: usize,

    #[arg(short = 's', long, value_enum, default_value_t = Strategy::DoubleHashing)]
    strategy: Strategy,

    #[arg(short = 'l', long = "load_factor", default_value_t = 0.72)]
    load_factor: f32,

    /// Number of values to insert. Defaults to the target capacity.
    #[arg(short = 'n', long)]
    count: Option<usize>,

    /// Every n-th inserted value is removed again.
    #[arg(short = 'r', long = "remove_every", default_value_t = 4)]
    remove_every: usize,
}

fn main() -> Result<(), prime_hash::Error> {
    let args = Args::parse();

    println!(
        "Creating {:?} table with target capacity: {}",
        args.strategy, args.target_capacity
    );

    let config = TableConfig::new(args.strategy.into())
        .with_capacity(args.target_capacity)
        .with_load_factor(args.load_factor);
    let mut table: HashTable<u64, u64, _> = HashTable::with_config(config)?;

    println!("Actual capacity: {}", table.capacity());
    println!("Filling table with u64 values...");

    let count = args.count.unwrap_or(args.target_capacity) as u64;
    for value in 0..count {
        table.add(value, value * 2)?;
    }

    println!(
        "Inserted {} values, capacity is now {}",
        table.len(),
        table.capacity()
    );

    let mut removed = 0;
    if args.remove_every > 0 {
        for value in (0..count).step_by(args.remove_every) {
            table.remove(&value)?;
            removed += 1;
        }
    }
    println!("Removed {removed} values");

    table.debug_stats().print();
    Ok(())
}
