#![allow(clippy::all)]

use std::collections::HashMap;

use cadenza::{
    storage::catalog::{home_slot, IdentityTable, Slot},
    types::{Namespace, NodeId, Result},
};
use rand::{distributions::Alphanumeric, Rng};

fn random_string(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .map(char::from)
        .take(len)
        .collect()
}

fn random_names(count: usize) -> Vec<String> {
    let mut names = Vec::with_capacity(count);
    while names.len() < count {
        let len = rand::thread_rng().gen_range(1..24);
        let name = random_string(len);
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[test]
fn random_names_resolve_after_growth() -> Result<()> {
    let names = random_names(300);
    let mut table = IdentityTable::with_capacity(Namespace::Artist, 10)?;
    for (i, name) in names.iter().enumerate() {
        let inserted = table.insert(name, NodeId(i))?;
        assert!(inserted.added, "{name} reported as duplicate");
        assert!(
            table.len() * 2 <= table.capacity(),
            "load factor exceeded: {} of {}",
            table.len(),
            table.capacity()
        );
    }
    assert_eq!(table.len(), names.len());
    for (i, name) in names.iter().enumerate() {
        assert_eq!(table.lookup(name), Some(NodeId(i)), "lost {name}");
    }
    let snapshot = table.metrics_snapshot();
    assert_eq!(snapshot.inserts, 300);
    assert!(snapshot.growths >= 5);
    Ok(())
}

#[test]
fn interleaved_deletes_keep_survivors_reachable() -> Result<()> {
    let names = random_names(200);
    let mut table = IdentityTable::with_capacity(Namespace::Song, 16)?;
    let mut live: HashMap<String, NodeId> = HashMap::new();
    for (i, name) in names.iter().enumerate() {
        table.insert(name, NodeId(i))?;
        live.insert(name.clone(), NodeId(i));
        if i % 3 == 2 {
            let victim = &names[i - 1];
            assert_eq!(table.delete(victim), Some(NodeId(i - 1)));
            live.remove(victim);
        }
    }
    assert_eq!(table.len(), live.len());
    for name in &names {
        assert_eq!(table.lookup(name), live.get(name).copied(), "{name}");
    }
    let listed: usize = table.entries().count();
    assert_eq!(listed, live.len());
    Ok(())
}

#[test]
fn tombstones_are_reused_and_dropped_on_growth() -> Result<()> {
    let mut table = IdentityTable::with_capacity(Namespace::Artist, 10)?;
    table.insert("Test", NodeId(0))?;
    table.insert("Tets", NodeId(1))?;
    table.delete("Test");
    assert!(table
        .slots()
        .any(|(pos, slot)| pos == 6 && matches!(slot, Slot::Tombstone)));
    table.insert("Ttes", NodeId(2))?;
    let six = table.slots().find(|(pos, _)| *pos == 6).map(|(_, s)| s.clone());
    assert!(matches!(six, Some(Slot::Occupied(entry)) if entry.key == "Ttes"));

    table.delete("Tets");
    for i in 0..5 {
        table.insert(&format!("filler-{i}"), NodeId(10 + i))?;
    }
    assert!(table.capacity() > 10);
    assert!(table.slots().all(|(_, slot)| !matches!(slot, Slot::Tombstone)));
    Ok(())
}

#[test]
fn home_slot_is_stable_across_tables() {
    for name in random_names(50) {
        for capacity in [7, 10, 16, 1024] {
            let home = home_slot(&name, capacity);
            assert!(home < capacity);
            assert_eq!(home, home_slot(&name, capacity));
        }
    }
}
