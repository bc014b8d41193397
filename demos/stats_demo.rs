use std::collections::hash_map::DefaultHasher;
use std::hash::BuildHasherDefault;

use clap::Parser;
use hi_hash::HashSet;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 1000)]
    capacity: usize,

    /// Percentage of the capacity to fill.
    #[arg(short = 'l', long = "load", default_value_t = 90)]
    load_percent: usize,
}

fn main() {
    let args = Args::parse();

    println!("Creating HashSet with capacity: {}", args.capacity);

    let mut set: HashSet<u64, BuildHasherDefault<DefaultHasher>> =
        HashSet::with_capacity(args.capacity);

    let target = (args.capacity * args.load_percent.min(100)) / 100;
    println!("Filling set with {target} u64 values...");

    let mut num_failures = 0;
    for value in 0..target as u64 {
        if set.insert(value).is_err() {
            num_failures += 1;
        }
    }

    println!("Inserted {} values into set", set.len());
    println!(
        "Final load factor: {:.2}%",
        (set.len() as f64 / set.capacity() as f64) * 100.0
    );

    set.as_table().probe_histogram().print();
    set.as_table().debug_stats().print();
    println!("Number of rejected inserts: {num_failures}");

    let absent = target as u64..target as u64 + 100;
    let found = absent.filter(|v| set.contains(v)).count();
    println!("Lookups of absent keys that found something: {found}");
}
