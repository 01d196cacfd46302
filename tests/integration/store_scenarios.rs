#![allow(clippy::all)]

use cadenza::{
    analytics::{self, paths::DistanceMatrix, union_find::UnionFind},
    db::Listing,
    GraphReport, Namespace, Notice, NodeId, RelationalStore, Result, StoreOptions,
};

fn open() -> Result<RelationalStore> {
    RelationalStore::open(StoreOptions::default())
}

#[test]
fn catalogue_builds_expected_components() -> Result<()> {
    let mut db = open()?;
    // Two bands sharing a cover song, plus an unrelated solo act.
    db.insert("Blind Lemon Jefferson", "Long Lonesome Blues")?;
    db.insert("Blind Lemon Jefferson", "Matchbox Blues")?;
    db.insert("Carl Perkins", "Matchbox Blues")?;
    db.insert("Carl Perkins", "Blue Suede Shoes")?;
    db.insert("Nina Simone", "Feeling Good")?;

    assert_eq!(db.table(Namespace::Artist).len(), 3);
    assert_eq!(db.table(Namespace::Song).len(), 4);
    assert_eq!(
        db.report(),
        GraphReport {
            components: 2,
            largest_component: 5,
            diameter: 4,
        }
    );
    Ok(())
}

#[test]
fn removing_a_bridge_splits_the_component() -> Result<()> {
    let mut db = open()?;
    db.insert("A", "S1")?;
    db.insert("A", "Bridge")?;
    db.insert("B", "Bridge")?;
    db.insert("B", "S2")?;
    assert_eq!(db.report().components, 1);

    let notices = db.remove_song("Bridge");
    assert_eq!(
        notices,
        vec![Notice::Removed {
            namespace: Namespace::Song,
            name: "Bridge".into(),
        }]
    );
    assert_eq!(
        db.report(),
        GraphReport {
            components: 2,
            largest_component: 2,
            diameter: 1,
        }
    );
    Ok(())
}

#[test]
fn removed_names_leave_tombstones_until_growth() -> Result<()> {
    let mut db = open()?;
    db.insert("A", "S1")?;
    db.insert("B", "S2")?;
    db.remove_artist("A");
    let debug = Listing::with_tombstones(db.table(Namespace::Artist)).to_string();
    assert!(debug.contains("TOMBSTONE"), "{debug}");
    assert!(!db.list_artists().to_string().contains("TOMBSTONE"));
    assert_eq!(db.list_artists().total, 1);
    Ok(())
}

#[test]
fn many_pairs_announce_every_table_growth() -> Result<()> {
    let mut db = open()?;
    let mut artist_doublings = 0;
    let mut song_doublings = 0;
    for i in 0..40 {
        for notice in db.insert(&format!("artist-{i}"), &format!("song-{i}"))? {
            match notice {
                Notice::TableDoubled {
                    namespace: Namespace::Artist,
                } => artist_doublings += 1,
                Notice::TableDoubled {
                    namespace: Namespace::Song,
                } => song_doublings += 1,
                _ => {}
            }
        }
    }
    // 10 -> 20 -> 40 -> 80 on load factor alone.
    assert_eq!(artist_doublings, 3);
    assert_eq!(db.table(Namespace::Artist).capacity(), 80);
    // Song keys also hit probe dead ends; each extra doubling is announced.
    assert!(song_doublings > 3);
    assert_eq!(db.table(Namespace::Song).capacity(), 10 << song_doublings);
    for i in 0..40 {
        assert!(db.identity(Namespace::Song, &format!("song-{i}")).is_some());
    }
    assert_eq!(db.report().components, 40);
    Ok(())
}

#[test]
fn analytics_building_blocks_agree_with_report() -> Result<()> {
    let mut db = open()?;
    db.insert("A", "S1")?;
    db.insert("A", "S2")?;
    db.insert("B", "S3")?;
    let graph = db.graph();

    let forest: UnionFind = analytics::components(graph);
    let a = db.identity(Namespace::Artist, "A").map(NodeId::index);
    let s2 = db.identity(Namespace::Song, "S2").map(NodeId::index);
    let b = db.identity(Namespace::Artist, "B").map(NodeId::index);
    let (a, s2, b) = (a.unwrap(), s2.unwrap(), b.unwrap());
    assert!(forest.connected(a, s2));
    assert!(!forest.connected(a, b));

    let largest = analytics::largest_component(graph, &forest);
    assert_eq!(largest.len(), 3);

    let matrix = DistanceMatrix::compute(graph);
    assert_eq!(matrix.get(a, s2), 1);
    assert_eq!(matrix.diameter_among(&largest), 2);
    assert_eq!(db.report().diameter, 2);
    Ok(())
}
