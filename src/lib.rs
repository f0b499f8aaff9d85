//! # danci-adaptive - 自适应测评核心
//!
//! 本 crate 提供纯 Rust 实现的测评估计核心:
//!
//! - **Ability Estimation** - Rasch (1PL) 能力估计, Newton-Raphson 最大似然
//! - **Efficiency Analysis** - 估计精度随样本量的变化, "继续提问 / 停止提问" 建议
//! - **Difficulty Control** - 基于得分与自评信心的下一题难度调整
//! - **Confidence Calibration** - 自评信心与实际表现的校准分析
//!
//! ## 设计理念
//!
//! - **纯计算** - 无 I/O, 无共享可变状态, 所有操作均为确定性函数
//! - **配置注入** - 阈值随组件实例注入, 同一进程可并行运行多套策略
//! - **输入校验** - 越界输入直接拒绝, 不做静默截断
//!
//! ## 模块结构
//!
//! - [`scale`] - 难度档位与连续难度参数的映射
//! - [`irt`] - 能力估计器 (含 [`irt::efficiency`] 效率分析)
//! - [`difficulty`] - 难度调整控制器
//! - [`calibration`] - 信心校准分析
//! - [`engine`] - 组合以上组件的无状态门面
//! - [`simulate`] - 可复现的作答模拟
//! - [`sanitize`] - 输入校验
//! - [`config`] - 各组件配置
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use danci_adaptive::{AdaptiveEngine, CalibrationCategory, DifficultyLevel, ReasonCode, ResponseObservation};
//!
//! let engine = AdaptiveEngine::default();
//!
//! let calibration = engine.compute_calibration(50.0, 5).unwrap();
//! assert_eq!(calibration.category, CalibrationCategory::Overconfident);
//!
//! let window = vec![
//!     ResponseObservation::new(0.0, true, 2100),
//!     ResponseObservation::new(1.0, false, 4300),
//!     ResponseObservation::new(-1.0, true, 1800),
//! ];
//! let estimation = engine.estimate_ability(&window).unwrap();
//! assert!(estimation.estimate().is_some());
//!
//! let adjustment = engine.adjust_difficulty(DifficultyLevel::new(2), 90.0, 5).unwrap();
//! assert_eq!(adjustment.reason_code, ReasonCode::CorrectConfidentIncrease);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod calibration;
pub mod config;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod irt;
pub mod sanitize;
pub mod scale;
pub mod simulate;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出所有公共类型
pub use types::*;

pub use calibration::CalibrationAnalyzer;
pub use config::{
    BandSet, CalibrationPolicy, ControllerConfig, EfficiencyConfig, EngineConfig, EstimatorConfig,
    ScaleConfig,
};
pub use difficulty::DifficultyController;
pub use engine::{AdaptiveEngine, ResponseInput, StepOutcome};
pub use error::{CoreError, Result};
pub use irt::{AbilityEstimator, EfficiencyAnalyzer};
pub use scale::DifficultyScale;
pub use simulate::ResponseSimulator;
