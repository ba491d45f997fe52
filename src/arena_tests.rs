use super::*;

fn int(value: i64) -> NodeKind {
    NodeKind::Integer {
        span: Span::new(0, 0),
        value,
    }
}

fn empty_array() -> NodeKind {
    NodeKind::Array {
        list: List::EMPTY,
        origin: ArrayOrigin::Static,
    }
}

#[test]
fn allocate_returns_sequential_handles() {
    let mut arena = Arena::new();
    assert!(arena.is_empty());
    let a = arena.allocate(int(1));
    let b = arena.allocate(int(2));
    assert_eq!(a, Handle::ROOT);
    assert_eq!(b.index(), 1);
    assert_eq!(arena.len(), 2);
    assert_eq!(arena[a].kind, int(1));
    assert_eq!(arena.get(b).next, Handle::INVALID);
}

#[test]
fn handles_survive_growth() {
    let mut arena = Arena::new();
    let handles: Vec<Handle> = (0..1000).map(|i| arena.allocate(int(i))).collect();
    assert!(arena.capacity() >= 1000);
    for (i, h) in handles.iter().enumerate() {
        assert_eq!(arena[*h].kind, int(i as i64));
    }
}

#[test]
fn clear_keeps_capacity() {
    let mut arena = Arena::new();
    for i in 0..200 {
        arena.allocate(int(i));
    }
    let cap = arena.capacity();
    arena.clear();
    assert_eq!(arena.len(), 0);
    assert_eq!(arena.capacity(), cap);
    assert_eq!(arena.allocate(int(7)), Handle::ROOT);
}

#[test]
fn push_child_links_in_order() {
    let mut arena = Arena::new();
    let array = arena.allocate(empty_array());
    let children: Vec<Handle> = (0..5).map(|i| arena.allocate(int(i))).collect();
    for &child in &children {
        arena.push_child(array, child);
    }

    let list = *arena[array].kind.list().unwrap();
    assert_eq!(list.size, 5);
    assert_eq!(list.head, children[0]);
    assert_eq!(list.tail, children[4]);

    let walked: Vec<Handle> = arena.children(array).collect();
    assert_eq!(walked, children);
    assert_eq!(arena[children[4]].next, Handle::INVALID);
}

#[test]
fn children_of_empty_and_scalar_nodes() {
    let mut arena = Arena::new();
    let array = arena.allocate(empty_array());
    let scalar = arena.allocate(int(3));
    assert_eq!(arena.children(array).count(), 0);
    assert_eq!(arena.children(scalar).count(), 0);
}

#[test]
fn try_get_out_of_range() {
    let mut arena = Arena::new();
    arena.allocate(int(0));
    assert!(arena.try_get(Handle::ROOT).is_some());
    assert!(arena.try_get(Handle::INVALID).is_none());
}

#[test]
#[should_panic]
fn get_invalid_handle_panics() {
    let arena = Arena::new();
    let _ = arena.get(Handle::INVALID);
}

#[test]
fn value_kinds() {
    let table = NodeKind::Table {
        list: List::EMPTY,
        state: TableState::Header,
    };
    assert_eq!(table.value_kind(), Some(Kind::Table));
    assert_eq!(
        NodeKind::ArrayTable { list: List::EMPTY }.value_kind(),
        Some(Kind::Table)
    );
    assert_eq!(empty_array().value_kind(), Some(Kind::Array));
    assert_eq!(int(1).value_kind(), Some(Kind::Integer));
    let kv = NodeKind::KeyValue {
        key: Handle::INVALID,
        value: Handle::INVALID,
    };
    assert_eq!(kv.value_kind(), None);
    assert_eq!(kv.span(), None);
    assert_eq!(Kind::Datetime.to_string(), "datetime");
}
