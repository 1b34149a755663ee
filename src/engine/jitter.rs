// ==========================================
// 住所排班引擎 - 评分抖动源
// ==========================================
// 生产环境使用熵初始化的随机源；测试注入固定种子或零抖动，保证排序可复现
// ==========================================

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub trait JitterSource: Send {
    /// 返回 [0, max) 区间内的抖动值；max <= 0 时返回 0
    fn next_jitter(&mut self, max: f64) -> f64;
}

/// 随机抖动（StdRng）
pub struct RandomJitter {
    rng: StdRng,
}

impl RandomJitter {
    pub fn from_entropy() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl JitterSource for RandomJitter {
    fn next_jitter(&mut self, max: f64) -> f64 {
        if max <= 0.0 || !max.is_finite() {
            return 0.0;
        }
        self.rng.gen_range(0.0..max)
    }
}

/// 零抖动：排序完全由基础分和名册顺序决定
#[derive(Debug, Clone, Copy, Default)]
pub struct ZeroJitter;

impl JitterSource for ZeroJitter {
    fn next_jitter(&mut self, _max: f64) -> f64 {
        0.0
    }
}
