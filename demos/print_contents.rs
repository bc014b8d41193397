use clap::Parser;
use hi_hash::FnOps;
use hi_hash::HashTable;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'c', long = "capacity", default_value_t = 10)]
    capacity: usize,

    /// Keys to insert and then remove, in order.
    #[arg(default_values_t = [19, 9, 39, 29])]
    keys: Vec<u32>,
}

type IntTable = HashTable<u32, FnOps<fn(&u32) -> u64, fn(&u32, &u32) -> bool, fn(&u32, &u32) -> bool>>;

fn print_contents(table: &IntTable) {
    for slot in table.slots() {
        match slot.element() {
            Some(value) => println!("{value}"),
            None => println!("---"),
        }
    }
}

fn main() {
    let args = Args::parse();

    let mut table: IntTable = HashTable::new(
        (|v: &u32| *v as u64) as fn(&u32) -> u64,
        (|a: &u32, b: &u32| a == b) as fn(&u32, &u32) -> bool,
        (|a: &u32, b: &u32| a > b) as fn(&u32, &u32) -> bool,
        args.capacity,
    );

    for key in &args.keys {
        if let Err(err) = table.insert(*key) {
            println!("Could not add {key}: {err}");
            continue;
        }
        println!("Adding another element");
        print_contents(&table);
        assert!(table.find(key).is_some());
    }

    for key in &args.keys {
        assert!(table.find(key).is_some() || table.is_full());
    }

    for key in &args.keys {
        match table.remove(key) {
            Ok(_) => println!("Removing another element"),
            Err(err) => println!("Could not remove {key}: {err}"),
        }
        print_contents(&table);
        assert!(table.find(key).is_none());
    }

    let (len, capacity) = table.size();
    println!("{len}/{capacity} slots in use");
}
