// Actor模块 - 使用Actor模式管理并发状态
//
// 用Actor模式替代Arc<Mutex<T>>，通过消息传递实现并发控制
// 消除锁竞争，避免死锁风险

pub mod llm_manager;
pub mod system_status;

pub use llm_manager::{LLMCommand, LLMHandle, LLMManagerActor};
pub use system_status::{SystemStatusActor, SystemStatusCommand, SystemStatusHandle};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LLMManager;

    #[tokio::test]
    async fn test_system_status_health_check() {
        let (actor, handle) = SystemStatusActor::new();

        tokio::spawn(async move {
            actor.run().await;
        });

        let is_healthy = handle.health_check().await;
        assert!(is_healthy, "SystemStatusActor应该是健康的");
    }

    #[tokio::test]
    async fn test_system_status_updates() {
        let (actor, handle) = SystemStatusActor::new();
        tokio::spawn(async move {
            actor.run().await;
        });

        handle.set_analyzing(true).await;
        handle.record_analysis().await;

        let status = handle.get().await;
        assert!(status.is_analyzing);
        assert_eq!(status.analysis_count, 1);
        assert!(status.last_analysis_time.is_some());
    }

    #[tokio::test]
    async fn test_llm_actor_health_check() {
        let manager = LLMManager::new(reqwest::Client::new());
        let (actor, handle) = LLMManagerActor::new(manager);

        tokio::spawn(async move {
            actor.run().await;
        });

        assert!(handle.health_check().await);
        assert_eq!(handle.get_config().await.unwrap().provider, "qwen");
    }

    #[tokio::test]
    async fn test_health_check_on_stopped_actor() {
        // 创建Actor但不运行，模拟Actor无响应
        let (actor, handle) = SystemStatusActor::new();
        drop(actor);

        let is_healthy = handle.health_check().await;
        assert!(!is_healthy, "停止的Actor应该健康检查失败");
    }
}
