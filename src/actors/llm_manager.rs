// LLM Manager Actor - 使用Actor模式管理LLM状态
//
// 用消息传递替代锁机制，消除Arc<Mutex<LLMManager>>的锁竞争

use crate::llm::{ExtractionResult, LLMConfig, LLMManager, ProductType};
use anyhow::Result;
use tokio::sync::{mpsc, oneshot};

/// LLM管理器命令
pub enum LLMCommand {
    /// 配置LLM
    Configure {
        config: LLMConfig,
        reply: oneshot::Sender<Result<()>>,
    },

    /// 切换 LLM provider
    SwitchProvider {
        provider: String,
        reply: oneshot::Sender<Result<()>>,
    },

    /// 从标签图片提取成分
    Extract {
        image_path: String,
        product_type: ProductType,
        reply: oneshot::Sender<Result<ExtractionResult>>,
    },

    /// 分析成分文本
    Analyze {
        ingredients: String,
        product_type: ProductType,
        reply: oneshot::Sender<Result<String>>,
    },

    /// 获取配置
    GetConfig { reply: oneshot::Sender<LLMConfig> },

    /// 当前provider是否已配置
    IsConfigured { reply: oneshot::Sender<bool> },

    /// 健康检查（Ping）
    HealthCheck { reply: oneshot::Sender<()> },
}

/// LLM Manager Actor（无需外层Mutex）
pub struct LLMManagerActor {
    receiver: mpsc::Receiver<LLMCommand>,
    manager: LLMManager, // 直接持有，无需锁
}

impl LLMManagerActor {
    /// 创建新的Actor
    pub fn new(manager: LLMManager) -> (Self, LLMHandle) {
        let (sender, receiver) = mpsc::channel(64);
        let actor = Self { receiver, manager };
        let handle = LLMHandle { sender };
        (actor, handle)
    }

    /// 运行Actor（在单独的任务中运行）
    pub async fn run(mut self) {
        tracing::info!("LLM Manager Actor 已启动");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                LLMCommand::Configure { config, reply } => {
                    let result = self.manager.configure(config).await;
                    let _ = reply.send(result);
                }

                LLMCommand::SwitchProvider { provider, reply } => {
                    let result = self.manager.switch_provider(&provider).await;
                    let _ = reply.send(result);
                }

                LLMCommand::Extract {
                    image_path,
                    product_type,
                    reply,
                } => {
                    let result = self
                        .manager
                        .extract_ingredients(&image_path, product_type)
                        .await;
                    let _ = reply.send(result);
                }

                LLMCommand::Analyze {
                    ingredients,
                    product_type,
                    reply,
                } => {
                    let result = self
                        .manager
                        .analyze_ingredients(&ingredients, product_type)
                        .await;
                    let _ = reply.send(result);
                }

                LLMCommand::GetConfig { reply } => {
                    let config = self.manager.get_config().await;
                    let _ = reply.send(config);
                }

                LLMCommand::IsConfigured { reply } => {
                    let _ = reply.send(self.manager.is_configured());
                }

                LLMCommand::HealthCheck { reply } => {
                    // 立即响应，表明Actor正常运行
                    let _ = reply.send(());
                }
            }
        }

        tracing::info!("LLM Manager Actor 已停止");
    }
}

/// LLM Handle（用于与Actor通信，可克隆）
#[derive(Clone)]
pub struct LLMHandle {
    sender: mpsc::Sender<LLMCommand>,
}

impl LLMHandle {
    /// 配置LLM
    pub async fn configure(&self, config: LLMConfig) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::Configure { config, reply })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))?
    }

    /// 切换 LLM provider
    pub async fn switch_provider(&self, provider: &str) -> Result<()> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::SwitchProvider {
                provider: provider.to_string(),
                reply,
            })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))?
    }

    /// 从标签图片提取成分
    pub async fn extract(
        &self,
        image_path: &str,
        product_type: ProductType,
    ) -> Result<ExtractionResult> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::Extract {
                image_path: image_path.to_string(),
                product_type,
                reply,
            })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))?
    }

    /// 分析成分文本
    pub async fn analyze(&self, ingredients: &str, product_type: ProductType) -> Result<String> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::Analyze {
                ingredients: ingredients.to_string(),
                product_type,
                reply,
            })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))?
    }

    /// 获取配置
    pub async fn get_config(&self) -> Result<LLMConfig> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::GetConfig { reply })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))
    }

    /// 当前provider是否已配置
    pub async fn is_configured(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.sender
            .send(LLMCommand::IsConfigured { reply })
            .await
            .map_err(|_| anyhow::anyhow!("Actor通道已关闭"))?;
        rx.await.map_err(|_| anyhow::anyhow!("Actor已停止"))
    }

    /// 健康检查
    /// 返回true表示Actor正常运行，false表示Actor无响应或已停止
    /// 超时时间为5秒
    pub async fn health_check(&self) -> bool {
        let (reply, rx) = oneshot::channel();

        if self
            .sender
            .send(LLMCommand::HealthCheck { reply })
            .await
            .is_err()
        {
            tracing::warn!("LLM Manager Actor 健康检查失败: 通道已关闭");
            return false;
        }

        match tokio::time::timeout(std::time::Duration::from_secs(5), rx).await {
            Ok(Ok(())) => {
                tracing::debug!("LLM Manager Actor 健康检查成功");
                true
            }
            Ok(Err(_)) => {
                tracing::warn!("LLM Manager Actor 健康检查失败: Actor已停止");
                false
            }
            Err(_) => {
                tracing::warn!("LLM Manager Actor 健康检查失败: 超时(5秒)");
                false
            }
        }
    }
}
