//! Integration tests for the callbox crate.
//!
//! ## Scenario Tests
//! - `test_copyable_counters`: Two counters captured by reference, moved and
//!   swapped between copyable containers
//! - `test_move_only_heap_buffer`: A boxed, non-cloneable callable moved and
//!   swapped between containers
//! - `test_copy_only_counters`: The counter scenario with callables that opt
//!   out of relocation
//!
//! ## Selection Tests
//! - `test_selection_from_returned_closures`: Closures returned as
//!   `impl FnMut` land in the variant their bounds allow
//! - `test_explicit_variant`: Naming the marker stores inline closures in any
//!   variant that accepts them
//!
//! ## Value Semantics Tests
//! - `test_call_matches_direct_call`: Containers behave like the callable
//!   they hold, for several arities
//! - `test_clone_independence`: Clones do not share state unless the callable
//!   shares it
//! - `test_reassignment_sequence`: Repeated assignment between containers
//!   keeps every counter consistent
//!
//! ## Memory Management Tests
//! - `test_drop_exactly_once`: Every stored callable is dropped exactly once
//! - `test_panicking_callable_keeps_container`: A panic while calling leaves
//!   the callable in place
//! - `test_panicking_clone`: A panic while cloning leaves the target empty
//! - `test_copy_only_swap_with_panicking_clone`: A panic while swapping
//!   copy-only containers changes neither of them

use std::{
    cell::{Cell, RefCell},
    marker::PhantomPinned,
    panic::{AssertUnwindSafe, catch_unwind},
    rc::Rc,
};

use callbox::{
    Capability, CopyFunction, EmptyCall, Function, MoveFunction, Placement, classify,
    make_function, markers,
};

type Step = fn();

// Test data structures
#[derive(Clone)]
struct Tracked {
    drops: Rc<Cell<usize>>,
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

struct HeapBuffer<'a> {
    values: Box<[i32]>,
    reads: &'a Cell<i32>,
    _reserved: [usize; 2],
}

/// Panics when cloned while `fail` is set.
struct Flaky<'a> {
    fail: &'a Cell<bool>,
}

impl Clone for Flaky<'_> {
    fn clone(&self) -> Self {
        assert!(!self.fail.get(), "clone failed");
        Self { fail: self.fail }
    }
}

fn pinned_adjust(counter: &Cell<i32>, delta: i32) -> impl FnMut() + Clone + '_ {
    let pinned = PhantomPinned;
    move || {
        let _pinned = &pinned;
        counter.set(counter.get() + delta);
    }
}

impl HeapBuffer<'_> {
    fn advance(&mut self) {
        for (index, value) in self.values.iter_mut().enumerate() {
            *value += index as i32;
        }
        self.reads.set(self.values[100]);
    }
}

fn heap_reader(mut buffer: HeapBuffer<'_>) -> impl FnMut() + '_ {
    move || buffer.advance()
}

#[test]
fn test_copyable_counters() {
    let i = Cell::new(0);
    let n = Cell::new(0);
    let l = || i.set(i.get() + 1);
    l();
    assert_eq!(i.get(), 1);

    let mut j: Function<Step> = make_function!(Step, l);
    j.call(()).unwrap();
    assert_eq!(i.get(), 2);

    let mut k: Function<Step> = make_function!(Step, l);
    k.call(()).unwrap();
    assert_eq!(i.get(), 3);

    j.assign_from(&mut k);
    j.call(()).unwrap();
    assert_eq!(i.get(), 4);
    assert_eq!(k.call(()), Err(EmptyCall));

    let mut t: Function<Step> = make_function!(Step, || i.set(i.get() - 1));
    t.call(()).unwrap();
    assert_eq!(i.get(), 3);

    std::mem::swap(&mut j, &mut t);
    j.call(()).unwrap();
    assert_eq!(i.get(), 2);
    t.call(()).unwrap();
    assert_eq!(i.get(), 3);

    // A second counter is only touched through its own container
    let mut m: Function<Step> = make_function!(Step, || n.set(n.get() - 1));
    j.clone_from(&m);
    j.call(()).unwrap();
    m.call(()).unwrap();
    t.call(()).unwrap();
    assert_eq!((i.get(), n.get()), (4, -2));
}

#[test]
fn test_move_only_heap_buffer() {
    assert_eq!(size_of::<MoveFunction<'static, Step>>(), 4 * size_of::<usize>());

    let reads = Cell::new(0);
    let buffer = HeapBuffer {
        values: vec![0; 100_000].into_boxed_slice(),
        reads: &reads,
        _reserved: [0; 2],
    };
    let mut p: MoveFunction<Step> = make_function!(Step, heap_reader(buffer));
    assert_eq!(p.placement(), Some(Placement::Heap));

    p.call(()).unwrap();
    assert_eq!(reads.get(), 100);

    let mut q = p.take();
    q.call(()).unwrap();
    assert_eq!(reads.get(), 200);

    p.swap(&mut q);
    p.call(()).unwrap();
    assert_eq!(reads.get(), 300);

    assert_eq!(q.call(()), Err(EmptyCall));
}

#[test]
fn test_copy_only_counters() {
    assert_eq!(classify!(PhantomPinned), Capability::CopyOnly);

    let i = Cell::new(0);
    let mut l = pinned_adjust(&i, 1);
    l();
    assert_eq!(i.get(), 1);

    let mut j: CopyFunction<Step> = make_function!(Step, l.clone());
    j.call(()).unwrap();
    assert_eq!(i.get(), 2);

    let mut k: CopyFunction<Step> = make_function!(Step, l);
    k.call(()).unwrap();
    assert_eq!(i.get(), 3);

    j.assign_from(&mut k);
    j.call(()).unwrap();
    assert_eq!(i.get(), 4);
    assert!(k.is_empty());

    let mut t: CopyFunction<Step> = make_function!(Step, pinned_adjust(&i, -1));
    t.call(()).unwrap();
    assert_eq!(i.get(), 3);

    j.swap(&mut t);
    j.call(()).unwrap();
    assert_eq!(i.get(), 2);
    t.call(()).unwrap();
    assert_eq!(i.get(), 3);
}

#[test]
fn test_selection_from_returned_closures() {
    fn copyable(count: &Cell<i32>) -> impl FnMut() -> i32 + Clone + '_ {
        move || {
            count.set(count.get() + 1);
            count.get()
        }
    }

    fn move_only(count: &Cell<i32>) -> impl FnMut() -> i32 + '_ {
        move || {
            count.set(count.get() + 10);
            count.get()
        }
    }

    let count = Cell::new(0);
    let mut a: Function<fn() -> i32> = make_function!(fn() -> i32, copyable(&count));
    let mut b: MoveFunction<fn() -> i32> = make_function!(fn() -> i32, move_only(&count));
    assert_eq!(a.call(()), Ok(1));
    assert_eq!(b.call(()), Ok(11));

    let mut c = a.clone();
    assert_eq!(c.call(()), Ok(12));
}

#[test]
fn test_explicit_variant() {
    struct Unique;

    let unique = Unique;
    let counter = Cell::new(0);
    let calls = &counter;
    let mut unique_call = make_function!(markers::MoveOnly, fn() -> i32, move || {
        let _unique = &unique;
        calls.set(calls.get() + 1);
        calls.get()
    });
    let _: &MoveFunction<fn() -> i32> = &unique_call;
    assert_eq!(unique_call.call(()), Ok(1));

    let pinned = PhantomPinned;
    let mut pinned_call = make_function!(markers::CopyOnly, fn() -> i32, move || {
        let _pinned = &pinned;
        calls.set(calls.get() + 1);
        calls.get()
    });
    let _: &CopyFunction<fn() -> i32> = &pinned_call;
    let mut copy = pinned_call.clone();
    assert_eq!(pinned_call.call(()), Ok(2));
    assert_eq!(copy.call(()), Ok(3));

    let mut plain = make_function!(markers::Copyable, Step, || calls.set(0));
    plain.call(()).unwrap();
    assert_eq!(counter.get(), 0);
}

#[test]
fn test_call_matches_direct_call() {
    let direct = |a: u8, b: u16, c: u32| u64::from(a) * u64::from(b) + u64::from(c);
    let mut wrapped = Function::<fn(u8, u16, u32) -> u64>::new(direct);
    assert_eq!(wrapped.call((3, 4, 5)), Ok(direct(3, 4, 5)));

    let mut greet = Function::<fn(String) -> String>::new(|name: String| name + "!");
    assert_eq!(greet.call((String::from("hi"),)), Ok(String::from("hi!")));

    let mut nothing = Function::<fn() -> Option<u8>>::new(|| None::<u8>);
    assert_eq!(nothing.call(()), Ok(None));

    type Parse = fn(&'static str) -> Result<i32, std::num::ParseIntError>;
    let mut fallible = Function::<Parse>::new(|text: &'static str| text.parse::<i32>());
    assert_eq!(fallible.call(("42",)), Ok(Ok(42)));
    assert!(matches!(fallible.call(("forty two",)), Ok(Err(_))));

    let log = RefCell::new(Vec::new());
    let mut push = Function::<fn(i32)>::new(|x: i32| log.borrow_mut().push(x));
    push.call((1,)).unwrap();
    push.call((2,)).unwrap();
    drop(push);
    assert_eq!(log.into_inner(), [1, 2]);
}

#[test]
fn test_clone_independence() {
    let mut count = 0;
    let mut original = Function::<fn() -> i32>::new(move || {
        count += 1;
        count
    });
    let mut copy = original.clone();
    assert_eq!(original.call(()), Ok(1));
    assert_eq!(original.call(()), Ok(2));
    assert_eq!(copy.call(()), Ok(1));

    // Shared state stays shared
    let shared = Cell::new(0);
    let mut first: Function<Step> = Function::new(|| shared.set(shared.get() + 1));
    let mut second = first.clone();
    first.call(()).unwrap();
    second.call(()).unwrap();
    assert_eq!(shared.get(), 2);
}

#[test]
fn test_reassignment_sequence() {
    let up = Cell::new(0);
    let down = Cell::new(0);
    let mut a: Function<Step> = Function::new(|| up.set(up.get() + 1));
    let mut b: Function<Step> = Function::new(|| down.set(down.get() - 1));

    a.clone_from(&b);
    a.call(()).unwrap();
    b.call(()).unwrap();
    assert_eq!((up.get(), down.get()), (0, -2));

    b = Function::new(|| up.set(up.get() + 1));
    a.swap(&mut b);
    a.call(()).unwrap();
    b.call(()).unwrap();
    assert_eq!((up.get(), down.get()), (1, -3));

    b.clear();
    assert_eq!(b.call(()), Err(EmptyCall));
    b.clone_from(&a);
    b.call(()).unwrap();
    assert_eq!((up.get(), down.get()), (2, -3));

    let mut c = Function::<Step>::default();
    c.assign_from(&mut a);
    assert!(a.is_empty());
    c.call(()).unwrap();
    assert_eq!(up.get(), 3);
}

#[test]
fn test_drop_exactly_once() {
    let drops = Rc::new(Cell::new(0));
    let small = Tracked {
        drops: drops.clone(),
    };
    let large = (
        Tracked {
            drops: drops.clone(),
        },
        [0u64; 8],
    );

    {
        let mut inline: Function<Step> = Function::new(move || {
            let _small = &small;
        });
        let mut boxed: Function<Step> = Function::new(move || {
            let _large = &large;
        });
        assert_eq!(inline.placement(), Some(Placement::Inline));
        assert_eq!(boxed.placement(), Some(Placement::Heap));

        let inline_copy = inline.clone();
        let boxed_copy = boxed.clone();
        assert_eq!(drops.get(), 0);

        let mut move_only = boxed_copy.into_move_only();
        let mut copy_only = inline_copy.into_copy_only();
        assert_eq!(drops.get(), 0);

        let _taken = move_only.take();
        let _cloned_out = copy_only.take();
        assert_eq!(drops.get(), 1);

        inline.clear();
        assert_eq!(drops.get(), 2);
        boxed.clear();
        assert_eq!(drops.get(), 3);
    }

    assert_eq!(drops.get(), 5);
}

#[test]
fn test_panicking_callable_keeps_container() {
    let mut calls = 0;
    let mut function = Function::<fn(bool) -> i32>::new(move |fail: bool| {
        calls += 1;
        assert!(!fail, "asked to fail");
        calls
    });

    let result = catch_unwind(AssertUnwindSafe(|| function.call((true,))));
    assert!(result.is_err());
    assert!(!function.is_empty());
    assert_eq!(function.call((false,)), Ok(2));
}

#[test]
fn test_panicking_clone() {
    let fail = Cell::new(false);
    let clones = Rc::new(());
    let flaky = Flaky { fail: &fail };
    let counted = clones.clone();
    let source: Function<fn() -> bool> = Function::new(move || {
        let (flaky, _counted) = (&flaky, &counted);
        flaky.fail.get()
    });
    let mut target = source.clone();
    assert_eq!(Rc::strong_count(&clones), 3);

    fail.set(true);
    let result = catch_unwind(AssertUnwindSafe(|| target.clone_from(&source)));
    assert!(result.is_err());
    assert!(target.is_empty());
    assert_eq!(Rc::strong_count(&clones), 2);

    let result = catch_unwind(AssertUnwindSafe(|| source.clone()));
    assert!(result.is_err());
    assert_eq!(Rc::strong_count(&clones), 2);

    let mut source = source;
    assert_eq!(source.call(()), Ok(true));
    let mut target: Function<fn() -> bool, markers::MoveOnly> = source.into();
    assert_eq!(target.call(()), Ok(true));
}

#[test]
fn test_copy_only_swap_with_panicking_clone() {
    let fail = Cell::new(false);
    let flaky = Flaky { fail: &fail };
    let pinned = PhantomPinned;
    let mut first = CopyFunction::<fn() -> i32>::new(move || {
        let _state = (&flaky, &pinned);
        1i32
    });
    let mut second = CopyFunction::<fn() -> i32>::new(|| 2i32);

    fail.set(true);
    let result = catch_unwind(AssertUnwindSafe(|| first.swap(&mut second)));
    assert!(result.is_err());
    assert_eq!(first.call(()), Ok(1));
    assert_eq!(second.call(()), Ok(2));

    let result = catch_unwind(AssertUnwindSafe(|| second.swap(&mut first)));
    assert!(result.is_err());
    assert_eq!(first.call(()), Ok(1));
    assert_eq!(second.call(()), Ok(2));

    fail.set(false);
    first.swap(&mut second);
    assert_eq!(first.call(()), Ok(2));
    assert_eq!(second.call(()), Ok(1));
}
