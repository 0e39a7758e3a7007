use std::cell::RefCell;
use std::rc::Rc;

#[cfg(target_arch = "wasm32")]
use js_sys::Date;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use yosegi_core::{
    pick_puzzle, BoardSpec, DropOutcome, Game, GameAction, Geometry, ImageSize,
    PuzzleCatalogEntry, Scene, TileId, Viewport,
};

pub(crate) type AppSubscriber = Rc<dyn Fn()>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// What the view needs to paint one frame.
#[derive(Clone, Debug)]
pub(crate) struct AppSnapshot {
    pub scene: Scene,
    pub geometry: Geometry,
    pub load: LoadState,
    pub puzzle: Option<&'static PuzzleCatalogEntry>,
}

pub(crate) struct AppCore {
    state: RefCell<AppState>,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

struct AppState {
    game: Game,
    rng: SmallRng,
    load: LoadState,
    puzzle: Option<&'static PuzzleCatalogEntry>,
}

impl AppCore {
    pub(crate) fn new(spec: BoardSpec, viewport: Viewport) -> Rc<Self> {
        let seed = (u64::from(time_nonce(0)) << 32) | u64::from(time_nonce(0x5EED));
        Self::with_rng(spec, viewport, SmallRng::seed_from_u64(seed))
    }

    pub(crate) fn with_rng(spec: BoardSpec, viewport: Viewport, rng: SmallRng) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(AppState {
                game: Game::new(spec, viewport),
                rng,
                load: LoadState::Loading,
                puzzle: None,
            }),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        })
    }

    pub(crate) fn subscribe(&self, subscriber: AppSubscriber) -> AppSubscription {
        self.subscribers.borrow_mut().push(subscriber.clone());
        AppSubscription {
            subscriber,
            subscribers: Rc::clone(&self.subscribers),
        }
    }

    fn notify(&self) {
        let subscribers = self.subscribers.borrow().clone();
        for subscriber in subscribers {
            (subscriber)();
        }
    }

    pub(crate) fn snapshot(&self) -> AppSnapshot {
        let state = self.state.borrow();
        AppSnapshot {
            scene: state.game.scene(),
            geometry: *state.game.geometry(),
            load: state.load.clone(),
            puzzle: state.puzzle,
        }
    }

    pub(crate) fn geometry(&self) -> Geometry {
        *self.state.borrow().game.geometry()
    }

    pub(crate) fn load_state(&self) -> LoadState {
        self.state.borrow().load.clone()
    }

    pub(crate) fn is_dragging(&self) -> bool {
        self.state.borrow().game.is_dragging()
    }

    pub(crate) fn active_pointer(&self) -> Option<i32> {
        self.state
            .borrow()
            .game
            .drag()
            .active()
            .and_then(|drag| drag.pointer_id)
    }

    /// Picks the picture for this session. Only the first call chooses.
    pub(crate) fn choose_puzzle(&self) -> Option<&'static PuzzleCatalogEntry> {
        let mut state = self.state.borrow_mut();
        if state.puzzle.is_none() {
            let picked = pick_puzzle(&mut state.rng);
            state.puzzle = picked;
        }
        state.puzzle
    }

    /// Creates the tiles. Later calls are ignored so a duplicated load
    /// signal cannot reshuffle a game in progress.
    pub(crate) fn image_loaded(&self, size: ImageSize) -> bool {
        let mut state = self.state.borrow_mut();
        if state.load != LoadState::Loading {
            return false;
        }
        let AppState { game, rng, .. } = &mut *state;
        if !game.start(size, rng) {
            return false;
        }
        state.load = LoadState::Ready;
        drop(state);
        self.notify();
        true
    }

    pub(crate) fn image_failed(&self, message: String) {
        let mut state = self.state.borrow_mut();
        if state.load == LoadState::Ready {
            return;
        }
        state.load = LoadState::Failed(message);
        drop(state);
        self.notify();
    }

    pub(crate) fn set_viewport(&self, viewport: Viewport) -> Option<DropOutcome> {
        let mut state = self.state.borrow_mut();
        let cancelled = state.game.resize(viewport);
        drop(state);
        self.notify();
        cancelled
    }

    pub(crate) fn begin_drag(&self, x: f64, y: f64, pointer_id: Option<i32>) -> Option<TileId> {
        let mut state = self.state.borrow_mut();
        let picked = state.game.press(x, y, pointer_id)?;
        drop(state);
        self.notify();
        Some(picked)
    }

    pub(crate) fn drag_end(&self, pointer_id: Option<i32>) -> Option<DropOutcome> {
        let mut state = self.state.borrow_mut();
        let outcome = state.game.release(pointer_id)?;
        drop(state);
        self.notify();
        Some(outcome)
    }

    pub(crate) fn cancel_drag(&self) -> Option<DropOutcome> {
        let mut state = self.state.borrow_mut();
        let outcome = state.game.cancel()?;
        drop(state);
        self.notify();
        Some(outcome)
    }

    /// Feeds one input to the game; subscribers hear about it only when the
    /// board changed.
    pub(crate) fn apply_action(&self, action: GameAction) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.game.apply(action) {
            return false;
        }
        drop(state);
        self.notify();
        true
    }

    /// Reshuffles the current tiles. Returns false before the image is in.
    pub(crate) fn restart(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if state.load != LoadState::Ready {
            return false;
        }
        let AppState { game, rng, .. } = &mut *state;
        game.restart(rng);
        drop(state);
        self.notify();
        true
    }

    pub(crate) fn check(&self) -> bool {
        self.state.borrow().game.is_solved()
    }
}

pub(crate) struct AppSubscription {
    subscriber: AppSubscriber,
    subscribers: Rc<RefCell<Vec<AppSubscriber>>>,
}

impl Drop for AppSubscription {
    fn drop(&mut self) {
        let mut subscribers = self.subscribers.borrow_mut();
        subscribers.retain(|item| !Rc::ptr_eq(item, &self.subscriber));
    }
}

fn splitmix32(mut value: u32) -> u32 {
    value = value.wrapping_add(0x9E37_79B9);
    let mut z = value;
    z = (z ^ (z >> 16)).wrapping_mul(0x85EB_CA6B);
    z = (z ^ (z >> 13)).wrapping_mul(0xC2B2_AE35);
    z ^ (z >> 16)
}

fn time_nonce(salt: u32) -> u32 {
    #[cfg(target_arch = "wasm32")]
    {
        let now = Date::now() as u64;
        splitmix32((now as u32) ^ ((now >> 32) as u32) ^ salt.wrapping_add(0x9E37_79B9))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let now = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|duration| duration.as_nanos() as u32)
            .unwrap_or(0);
        splitmix32(now ^ salt.wrapping_add(0x9E37_79B9))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn core() -> Rc<AppCore> {
        let spec = BoardSpec::new(6, 6, 4, 4).unwrap();
        // 100px cells
        AppCore::with_rng(
            spec,
            Viewport::new(635.0, 1000.0, 1.0),
            SmallRng::seed_from_u64(77),
        )
    }

    fn counter(core: &AppCore) -> (Rc<Cell<u32>>, AppSubscription) {
        let count = Rc::new(Cell::new(0));
        let subscription = core.subscribe(Rc::new({
            let count = Rc::clone(&count);
            move || count.set(count.get() + 1)
        }));
        (count, subscription)
    }

    #[test]
    fn image_load_starts_once_and_notifies() {
        let core = core();
        let (count, _subscription) = counter(&core);
        assert!(core.choose_puzzle().is_some());
        assert_eq!(core.choose_puzzle().map(|entry| entry.slug), core.snapshot().puzzle.map(|entry| entry.slug));
        assert!(core.image_loaded(ImageSize::new(512, 512)));
        assert!(!core.image_loaded(ImageSize::new(512, 512)));
        assert_eq!(count.get(), 1);
        let snapshot = core.snapshot();
        assert_eq!(snapshot.load, LoadState::Ready);
        assert_eq!(snapshot.scene.tiles.len(), 16);
    }

    #[test]
    fn failed_image_keeps_board_empty() {
        let core = core();
        core.image_failed("puzzles/missing.png".to_string());
        assert!(matches!(core.load_state(), LoadState::Failed(_)));
        assert!(!core.image_loaded(ImageSize::new(10, 10)));
        assert!(!core.restart());
        let snapshot = core.snapshot();
        assert!(snapshot.scene.tiles.is_empty());
        assert_eq!(snapshot.scene.grid_lines.len(), 14);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let core = core();
        core.image_loaded(ImageSize::new(400, 400));
        let (count, subscription) = counter(&core);
        assert!(core.restart());
        assert_eq!(count.get(), 1);
        drop(subscription);
        assert!(core.restart());
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn drag_flow_tracks_pointer_and_resize_cancels() {
        let core = core();
        core.image_loaded(ImageSize::new(400, 400));
        let tile = core.snapshot().scene.tiles[0];
        let (x, y) = (tile.frame.x + 3.0, tile.frame.y + 3.0);
        core.apply_action(GameAction::Press { x, y, pointer_id: Some(9) });
        assert!(core.is_dragging());
        assert_eq!(core.active_pointer(), Some(9));
        assert_eq!(core.drag_end(Some(3)), None);

        let outcome = core.set_viewport(Viewport::new(1000.0, 800.0, 2.0));
        assert!(matches!(outcome, Some(DropOutcome::Cancelled { .. })));
        assert!(!core.is_dragging());
        assert_eq!(core.geometry().cell, 104.0);
        assert_eq!(core.cancel_drag(), None);
    }

    #[test]
    fn actions_notify_only_when_the_board_changes() {
        let core = core();
        core.image_loaded(ImageSize::new(400, 400));
        let tile = core.snapshot().scene.tiles[0];
        let (x, y) = (tile.frame.x + 3.0, tile.frame.y + 3.0);
        let (count, _subscription) = counter(&core);

        assert!(core.apply_action(GameAction::Press { x, y, pointer_id: Some(2) }));
        assert_eq!(count.get(), 1);
        assert!(!core.apply_action(GameAction::Move { x: x + 1.0, y, pointer_id: Some(2) }));
        assert!(!core.apply_action(GameAction::Move { x: x + 100.0, y, pointer_id: Some(5) }));
        assert_eq!(count.get(), 1);

        let moved = core.apply_action(GameAction::Move { x: x + 100.0, y, pointer_id: Some(2) })
            || core.apply_action(GameAction::Move { x: x - 100.0, y, pointer_id: Some(2) });
        assert!(moved);
        assert_eq!(count.get(), 2);
        assert!(core.apply_action(GameAction::Cancel));
        assert!(!core.is_dragging());
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn check_does_not_notify() {
        let core = core();
        core.image_loaded(ImageSize::new(400, 400));
        let (count, _subscription) = counter(&core);
        let first = core.check();
        assert_eq!(core.check(), first);
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn splitmix_scrambles_neighbours() {
        assert_ne!(splitmix32(1), splitmix32(2));
        assert_eq!(splitmix32(42), splitmix32(42));
    }
}
