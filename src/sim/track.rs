//! Procedural track generation
//!
//! The corridor is an endless stream of square blocks. A [`TrackCursor`]
//! remembers where the next block goes and which way it faces;
//! [`generate_next`] turns the cursor plus a few RNG draws into one fully
//! built [`Block`] (walls, obstacle, coins, all in world space) and the
//! advanced cursor.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::rng::TrackRng;
use crate::consts::*;
use crate::{forward_from_yaw, is_axis_aligned, is_x_facing, is_z_facing, right_from_yaw, wrap_degrees};

/// Block topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Normal,
    TurnLeft,
    TurnRight,
    /// Decision point that keeps heading straight
    TurnStraight,
}

impl BlockKind {
    pub fn is_turn(&self) -> bool {
        !matches!(self, BlockKind::Normal)
    }
}

/// A static wall box owned by its block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub center: Vec3,
    /// Full extents along world X, Y, Z
    pub size: Vec3,
}

impl Wall {
    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }

    /// Walls with no horizontal footprint are never drawn or collided with
    pub fn is_degenerate(&self) -> bool {
        self.size.x < DEGENERATE_WALL && self.size.z < DEGENERATE_WALL
    }
}

/// What the player has to do to get past an obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Low barrier, cleared by jumping over its top
    JumpWall,
    /// Raised bar, cleared by sliding under it
    SlideGate,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub kind: ObstacleKind,
    pub center: Vec3,
    pub size: Vec3,
    /// Latches on the first damaging collision
    pub hit: bool,
}

impl Obstacle {
    /// Build an obstacle centered on a block, sized for the block's heading
    pub fn for_block(kind: ObstacleKind, block_center: Vec3, yaw: f32) -> Self {
        let across_z = is_z_facing(yaw);
        let (across, height, depth, center_y) = match kind {
            ObstacleKind::JumpWall => (BLOCK_SIZE, 0.6, 0.7, 0.3),
            ObstacleKind::SlideGate => (BLOCK_SIZE, 1.0, 1.2, 1.5),
        };
        let size = if across_z {
            Vec3::new(across, height, depth)
        } else {
            Vec3::new(depth, height, across)
        };
        Self {
            kind,
            center: Vec3::new(block_center.x, center_y, block_center.z),
            size,
            hit: false,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::from_center_size(self.center, self.size)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec3,
    /// One-way: never reset once set
    pub collected: bool,
    /// Cosmetic spin angle (radians)
    pub rotation: f32,
}

impl Coin {
    pub fn new(pos: Vec3) -> Self {
        Self {
            pos,
            collected: false,
            rotation: 0.0,
        }
    }

    pub fn aabb(&self) -> Aabb {
        Aabb::cube(self.pos, COIN_RADIUS)
    }
}

/// One fixed-size track segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub kind: BlockKind,
    pub center: Vec3,
    /// Heading at creation (degrees); the local frame of all child geometry
    pub yaw: f32,
    pub left_wall: Option<Wall>,
    pub right_wall: Option<Wall>,
    pub front_wall: Option<Wall>,
    pub obstacle: Option<Obstacle>,
    pub coins: Vec<Coin>,
}

impl Block {
    /// Build a block's walls for its topology; obstacle and coins are added by
    /// the generator.
    pub fn new(index: u64, kind: BlockKind, center: Vec3, yaw: f32) -> Self {
        let forward = forward_from_yaw(yaw);
        let right = right_from_yaw(yaw);
        let half = BLOCK_SIZE * 0.5;
        let wall_offset = half + WALL_THICKNESS * 0.5;
        let lift = Vec3::new(0.0, WALL_HEIGHT * 0.5, 0.0);

        let side_size = Vec3::new(WALL_THICKNESS, WALL_HEIGHT, BLOCK_SIZE);
        let front_size = Vec3::new(BLOCK_SIZE + WALL_THICKNESS * 2.0, WALL_HEIGHT, WALL_THICKNESS);

        let left = Wall {
            center: center - right * wall_offset + lift,
            size: side_size,
        };
        let right_side = Wall {
            center: center + right * wall_offset + lift,
            size: side_size,
        };
        let front = Wall {
            center: center + forward * wall_offset + lift,
            size: front_size,
        };

        let (mut left_wall, mut right_wall, mut front_wall) = match kind {
            BlockKind::Normal | BlockKind::TurnStraight => (Some(left), Some(right_side), None),
            BlockKind::TurnLeft => (None, Some(right_side), Some(front)),
            BlockKind::TurnRight => (Some(left), None, Some(front)),
        };

        // Sizes above are in the block's local frame; along world X the
        // horizontal extents trade places so boxes stay world axis aligned.
        if is_x_facing(yaw) {
            for wall in [&mut left_wall, &mut right_wall, &mut front_wall]
                .into_iter()
                .flatten()
            {
                std::mem::swap(&mut wall.size.x, &mut wall.size.z);
            }
        }

        Self {
            index,
            kind,
            center,
            yaw,
            left_wall,
            right_wall,
            front_wall,
            obstacle: None,
            coins: Vec::new(),
        }
    }

    /// Present, non-degenerate walls in collision order (left, right, front)
    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        [&self.left_wall, &self.right_wall, &self.front_wall]
            .into_iter()
            .flatten()
            .filter(|w| !w.is_degenerate())
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.yaw)
    }

    pub fn right(&self) -> Vec3 {
        right_from_yaw(self.yaw)
    }
}

/// The generator's running placement state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCursor {
    pub next_index: u64,
    pub next_center: Vec3,
    /// Heading of the next block (degrees, [0, 360))
    pub build_yaw: f32,
    /// Coin side for the current 10-block cycle
    pub coin_on_left: bool,
    /// Whether this cycle's coins cross over on its `% 10 == 4` block
    pub coin_switch_at_block4: bool,
}

impl Default for TrackCursor {
    fn default() -> Self {
        Self {
            next_index: 0,
            next_center: Vec3::ZERO,
            build_yaw: START_YAW,
            coin_on_left: true,
            coin_switch_at_block4: false,
        }
    }
}

/// Turn blocks sit at every positive multiple of [`TURN_PERIOD`]
#[inline]
pub fn is_turn_index(index: u64) -> bool {
    index > 0 && index % TURN_PERIOD == 0
}

/// Obstacles every fourth block from 5 on, never right after a turn
#[inline]
pub fn has_obstacle_at(index: u64) -> bool {
    index >= 5 && index % 4 == 1 && index % TURN_PERIOD != 1
}

/// Coins on blocks 2..=6 of every 10-block cycle
#[inline]
pub fn has_coins_at(index: u64) -> bool {
    (2..=6).contains(&(index % 10))
}

/// Synthesize the block at `cursor` and return it with the advanced cursor
pub fn generate_next(cursor: &TrackCursor, rng: &mut TrackRng) -> (Block, TrackCursor) {
    debug_assert!(is_axis_aligned(cursor.build_yaw), "build heading drifted off 90° grid");

    let index = cursor.next_index;
    let yaw = cursor.build_yaw;
    let mut next = cursor.clone();

    let kind = if is_turn_index(index) {
        let r = rng.uniform01();
        if r < 0.33 {
            BlockKind::TurnStraight
        } else if r < 0.66 {
            BlockKind::TurnLeft
        } else {
            BlockKind::TurnRight
        }
    } else {
        BlockKind::Normal
    };

    let mut block = Block::new(index, kind, cursor.next_center, yaw);

    if !kind.is_turn() && has_obstacle_at(index) {
        let obstacle_kind = if rng.uniform01() < 0.5 {
            ObstacleKind::JumpWall
        } else {
            ObstacleKind::SlideGate
        };
        block.obstacle = Some(Obstacle::for_block(obstacle_kind, block.center, yaw));
    }

    if has_coins_at(index) {
        block.coins = place_coins(&block, &mut next, rng);
    }

    // Advance the cursor
    next.next_center = cursor.next_center + forward_from_yaw(yaw) * BLOCK_SIZE;
    match kind {
        BlockKind::TurnLeft => {
            next.build_yaw = wrap_degrees(yaw + 90.0);
            next.next_center = block.center - block.right() * BLOCK_SIZE;
        }
        BlockKind::TurnRight => {
            next.build_yaw = wrap_degrees(yaw - 90.0);
            next.next_center = block.center + block.right() * BLOCK_SIZE;
        }
        BlockKind::Normal | BlockKind::TurnStraight => {}
    }
    next.next_index = index + 1;

    if kind.is_turn() {
        log::info!(
            "Block {} is {:?} (heading {} -> {})",
            index,
            kind,
            yaw,
            next.build_yaw
        );
    }
    log::trace!(
        "Generated block {} at ({:.2}, {:.2}) obstacle={:?} coins={}",
        index,
        block.center.x,
        block.center.z,
        block.obstacle.map(|o| o.kind),
        block.coins.len()
    );

    (block, next)
}

/// Lay out the five coins of a coin-bearing block, updating the cycle's
/// side/switch state in `cursor`.
fn place_coins(block: &Block, cursor: &mut TrackCursor, rng: &mut TrackRng) -> Vec<Coin> {
    const LEFT: f32 = -1.0;
    const RIGHT: f32 = 1.0;

    let slot = block.index % 10;
    if slot == 2 {
        cursor.coin_on_left = rng.uniform01() < 0.5;
        cursor.coin_switch_at_block4 = false;
    }
    if slot == 4 {
        cursor.coin_switch_at_block4 = rng.uniform01() < 0.5;
    }

    let on_left = if cursor.coin_switch_at_block4 && slot >= 5 {
        !cursor.coin_on_left
    } else {
        cursor.coin_on_left
    };
    let (start, end) = if cursor.coin_on_left { (LEFT, RIGHT) } else { (RIGHT, LEFT) };
    let crossing = slot == 4 && cursor.coin_switch_at_block4;
    let arc_over_wall = matches!(
        block.obstacle,
        Some(Obstacle { kind: ObstacleKind::JumpWall, .. })
    );

    let forward = block.forward();
    let right = block.right();

    (0..COINS_PER_BLOCK)
        .map(|i| {
            let forward_offset = (i as f32 - 2.0) * COIN_SPACING;
            let lateral = if crossing {
                let t = (i as f32 + 1.0) / 6.0;
                start + (end - start) * t
            } else if on_left {
                LEFT
            } else {
                RIGHT
            };
            let mut pos = block.center + right * lateral + forward * forward_offset;
            pos.y = match (arc_over_wall, i) {
                (true, 1) | (true, 3) => 1.4,
                (true, 2) => 1.8,
                _ => COIN_HEIGHT,
            };
            Coin::new(pos)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(count: usize) -> Vec<Block> {
        let mut rng = TrackRng::new(DEFAULT_SEED);
        let mut cursor = TrackCursor::default();
        (0..count)
            .map(|_| {
                let (block, next) = generate_next(&cursor, &mut rng);
                cursor = next;
                block
            })
            .collect()
    }

    #[test]
    fn test_indices_are_sequential() {
        let blocks = generate(120);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.index, i as u64);
        }
    }

    #[test]
    fn test_initial_fifty_blocks_scenario() {
        let blocks = generate(50);
        assert!(blocks[20].kind.is_turn());
        assert!(blocks[5].obstacle.is_some());
        assert!(blocks[21].obstacle.is_none());
        assert!(!blocks[5].obstacle.as_ref().unwrap().hit);
    }

    #[test]
    fn test_first_block_geometry() {
        let blocks = generate(1);
        let block = &blocks[0];
        assert_eq!(block.kind, BlockKind::Normal);
        assert_eq!(block.center, Vec3::ZERO);
        assert_eq!(block.yaw, START_YAW);

        // Heading 180 faces -Z, so right is +X and side walls are thin in X
        let left = block.left_wall.expect("normal block has a left wall");
        let right = block.right_wall.expect("normal block has a right wall");
        assert!((left.center - Vec3::new(-2.75, 1.0, 0.0)).length() < 1e-4);
        assert!((right.center - Vec3::new(2.75, 1.0, 0.0)).length() < 1e-4);
        assert_eq!(left.size, Vec3::new(0.5, 2.0, 5.0));
        assert!(block.front_wall.is_none());
        assert!(block.coins.is_empty());
    }

    #[test]
    fn test_turn_left_walls() {
        let block = Block::new(20, BlockKind::TurnLeft, Vec3::ZERO, 180.0);
        assert!(block.left_wall.is_none());
        assert!(block.right_wall.is_some());
        let front = block.front_wall.expect("turn blocks close the corridor ahead");
        assert!((front.center - Vec3::new(0.0, 1.0, -2.75)).length() < 1e-4);
        assert_eq!(front.size, Vec3::new(6.0, 2.0, 0.5));
        assert_eq!(block.walls().count(), 2);
    }

    #[test]
    fn test_turn_right_walls() {
        let block = Block::new(40, BlockKind::TurnRight, Vec3::ZERO, 180.0);
        assert!(block.left_wall.is_some());
        assert!(block.right_wall.is_none());
        assert!(block.front_wall.is_some());
    }

    #[test]
    fn test_wall_sizes_swap_along_x() {
        let block = Block::new(3, BlockKind::Normal, Vec3::ZERO, 90.0);
        let left = block.left_wall.unwrap();
        // Heading +X: side walls run along X, so they are long in X
        assert_eq!(left.size, Vec3::new(5.0, 2.0, 0.5));
        assert!((left.center.z.abs() - 2.75).abs() < 1e-4);

        let turn = Block::new(20, BlockKind::TurnRight, Vec3::ZERO, 270.0);
        assert_eq!(turn.front_wall.unwrap().size, Vec3::new(0.5, 2.0, 6.0));
    }

    #[test]
    fn test_obstacle_dimensions_by_heading() {
        let jump_z = Obstacle::for_block(ObstacleKind::JumpWall, Vec3::ZERO, 180.0);
        assert_eq!(jump_z.size, Vec3::new(5.0, 0.6, 0.7));
        assert_eq!(jump_z.center.y, 0.3);

        let jump_x = Obstacle::for_block(ObstacleKind::JumpWall, Vec3::ZERO, 90.0);
        assert_eq!(jump_x.size, Vec3::new(0.7, 0.6, 5.0));

        let gate_z = Obstacle::for_block(ObstacleKind::SlideGate, Vec3::ZERO, 0.0);
        assert_eq!(gate_z.size, Vec3::new(5.0, 1.0, 1.2));
        assert_eq!(gate_z.center.y, 1.5);
        assert_eq!(gate_z.aabb().min.y, 1.0);

        let gate_x = Obstacle::for_block(ObstacleKind::SlideGate, Vec3::ZERO, 270.0);
        assert_eq!(gate_x.size, Vec3::new(1.2, 1.0, 5.0));
    }

    #[test]
    fn test_straight_blocks_advance_forward() {
        let blocks = generate(20);
        for pair in blocks.windows(2) {
            let step = pair[1].center - pair[0].center;
            assert!((step - Vec3::new(0.0, 0.0, -BLOCK_SIZE)).length() < 1e-4);
        }
    }

    /// Re-roll the turn block at `index` until it comes out as `kind`
    fn turn_block(kind: BlockKind, index: u64) -> (Block, TrackCursor) {
        let mut rng = TrackRng::default();
        let cursor = TrackCursor {
            next_index: index,
            ..TrackCursor::default()
        };
        for _ in 0..256 {
            let (block, next) = generate_next(&cursor, &mut rng);
            if block.kind == kind {
                return (block, next);
            }
        }
        panic!("no draw produced {kind:?}");
    }

    #[test]
    fn test_turn_left_cursor_uses_turn_block_right_vector() {
        let (turn, next) = turn_block(BlockKind::TurnLeft, 20);
        assert_eq!(next.build_yaw, 270.0);
        assert_eq!(next.next_index, 21);
        let expected = turn.center - turn.right() * BLOCK_SIZE;
        assert!((next.next_center - expected).length() < 1e-4);
        // Heading 270 runs along -X, which is where the cursor went
        assert!(next.next_center.x < 0.0);
    }

    #[test]
    fn test_turn_right_cursor() {
        let (_, next) = turn_block(BlockKind::TurnRight, 40);
        assert_eq!(next.build_yaw, 90.0);
        assert!((next.next_center - Vec3::new(BLOCK_SIZE, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_turn_straight_keeps_heading() {
        let (block, next) = turn_block(BlockKind::TurnStraight, 60);
        assert_eq!(next.build_yaw, START_YAW);
        assert!((next.next_center - Vec3::new(0.0, 0.0, -BLOCK_SIZE)).length() < 1e-4);
        assert!(block.front_wall.is_none());
        assert_eq!(block.walls().count(), 2);
    }

    #[test]
    fn test_corridor_continues_after_left_turn() {
        let (turn, next) = turn_block(BlockKind::TurnLeft, 20);
        let mut rng = TrackRng::default();
        let (after, _) = generate_next(&next, &mut rng);
        assert_eq!(after.yaw, 270.0);
        // The block after the turn sits beside the turn block, on its open side
        let offset = after.center - turn.center;
        assert!((offset.length() - BLOCK_SIZE).abs() < 1e-4);
        assert!(offset.dot(turn.right()) < 0.0);
    }

    #[test]
    fn test_coin_blocks_have_five_coins() {
        let blocks = generate(60);
        for block in &blocks {
            let expected = if has_coins_at(block.index) { COINS_PER_BLOCK } else { 0 };
            assert_eq!(block.coins.len(), expected, "block {}", block.index);
            assert!(block.coins.iter().all(|c| !c.collected));
        }
    }

    #[test]
    fn test_coins_follow_forward_axis() {
        let blocks = generate(10);
        let block = &blocks[3];
        let forward = block.forward();
        for (i, coin) in block.coins.iter().enumerate() {
            let along = (coin.pos - block.center).dot(forward);
            assert!((along - (i as f32 - 2.0) * COIN_SPACING).abs() < 1e-4);
        }
    }

    #[test]
    fn test_coins_arc_over_jump_wall() {
        let mut block = Block::new(5, BlockKind::Normal, Vec3::ZERO, 180.0);
        block.obstacle = Some(Obstacle::for_block(ObstacleKind::JumpWall, Vec3::ZERO, 180.0));
        let mut cursor = TrackCursor::default();
        let mut rng = TrackRng::default();
        let coins = place_coins(&block, &mut cursor, &mut rng);
        let heights: Vec<f32> = coins.iter().map(|c| c.pos.y).collect();
        assert_eq!(heights, vec![1.0, 1.4, 1.8, 1.4, 1.0]);
    }

    #[test]
    fn test_coin_crossover_on_switch_block() {
        let block = Block::new(4, BlockKind::Normal, Vec3::ZERO, 180.0);
        let right = block.right();
        let mut rng = TrackRng::default();
        for _ in 0..256 {
            let mut cursor = TrackCursor {
                coin_on_left: true,
                ..TrackCursor::default()
            };
            let coins = place_coins(&block, &mut cursor, &mut rng);
            if !cursor.coin_switch_at_block4 {
                assert!(coins.iter().all(|c| (c.pos.dot(right) + 1.0).abs() < 1e-4));
                continue;
            }
            let laterals: Vec<f32> = coins.iter().map(|c| c.pos.dot(right)).collect();
            assert!(laterals.windows(2).all(|w| w[1] > w[0]), "{laterals:?}");
            assert!((laterals[0] - (-1.0 + 2.0 / 6.0)).abs() < 1e-4);
            assert!((laterals[4] - (-1.0 + 2.0 * 5.0 / 6.0)).abs() < 1e-4);

            // Later blocks in the cycle sit on the other side
            let later = Block::new(5, BlockKind::Normal, Vec3::ZERO, 180.0);
            let coins = place_coins(&later, &mut cursor, &mut rng);
            assert!(coins.iter().all(|c| (c.pos.dot(right) - 1.0).abs() < 1e-4));
            return;
        }
        panic!("no draw produced a coin switch");
    }

    #[test]
    fn test_headings_stay_on_grid() {
        let blocks = generate(400);
        for block in &blocks {
            assert!(is_axis_aligned(block.yaw), "block {} yaw {}", block.index, block.yaw);
            assert!((0.0..360.0).contains(&block.yaw));
        }
    }
}
