// System Status Actor - 使用Actor模式管理系统状态
//
// 用消息传递替代Arc<RwLock<SystemStatus>>，消除锁竞争

use crate::models::SystemStatus;
use chrono::Utc;
use tokio::sync::{mpsc, oneshot};

/// 系统状态命令
pub enum SystemStatusCommand {
    /// 更新提取状态
    UpdateExtracting { is_extracting: bool },

    /// 更新分析状态
    UpdateAnalyzing { is_analyzing: bool },

    /// 记录一次完成的分析
    RecordAnalysis,

    /// 设置错误信息
    SetError { error: Option<String> },

    /// 获取状态
    Get {
        reply: oneshot::Sender<SystemStatus>,
    },

    /// 健康检查（Ping）
    HealthCheck { reply: oneshot::Sender<()> },
}

/// 系统状态Actor
pub struct SystemStatusActor {
    receiver: mpsc::Receiver<SystemStatusCommand>,
    status: SystemStatus, // 无需RwLock
}

impl SystemStatusActor {
    /// 创建新的Actor
    pub fn new() -> (Self, SystemStatusHandle) {
        let (sender, receiver) = mpsc::channel(50);
        let actor = Self {
            receiver,
            status: SystemStatus::default(),
        };
        let handle = SystemStatusHandle { sender };
        (actor, handle)
    }

    /// 运行Actor
    pub async fn run(mut self) {
        tracing::info!("System Status Actor 已启动");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                SystemStatusCommand::UpdateExtracting { is_extracting } => {
                    self.status.is_extracting = is_extracting;
                    if is_extracting {
                        self.status.last_extract_time = Some(Utc::now());
                    }
                }

                SystemStatusCommand::UpdateAnalyzing { is_analyzing } => {
                    self.status.is_analyzing = is_analyzing;
                    if is_analyzing {
                        self.status.last_analysis_time = Some(Utc::now());
                    }
                }

                SystemStatusCommand::RecordAnalysis => {
                    self.status.analysis_count += 1;
                    self.status.last_error = None;
                }

                SystemStatusCommand::SetError { error } => {
                    self.status.last_error = error;
                }

                SystemStatusCommand::Get { reply } => {
                    let _ = reply.send(self.status.clone());
                }

                SystemStatusCommand::HealthCheck { reply } => {
                    let _ = reply.send(());
                }
            }
        }

        tracing::info!("System Status Actor 已停止");
    }
}

/// 系统状态Handle（用于与Actor通信，可克隆）
#[derive(Clone)]
pub struct SystemStatusHandle {
    sender: mpsc::Sender<SystemStatusCommand>,
}

impl SystemStatusHandle {
    /// 更新提取状态
    pub async fn set_extracting(&self, is_extracting: bool) {
        let _ = self
            .sender
            .send(SystemStatusCommand::UpdateExtracting { is_extracting })
            .await;
    }

    /// 更新分析状态
    pub async fn set_analyzing(&self, is_analyzing: bool) {
        let _ = self
            .sender
            .send(SystemStatusCommand::UpdateAnalyzing { is_analyzing })
            .await;
    }

    /// 记录一次完成的分析
    pub async fn record_analysis(&self) {
        let _ = self.sender.send(SystemStatusCommand::RecordAnalysis).await;
    }

    /// 设置错误信息
    pub async fn set_error(&self, error: Option<String>) {
        let _ = self
            .sender
            .send(SystemStatusCommand::SetError { error })
            .await;
    }

    /// 获取状态快照
    pub async fn get(&self) -> SystemStatus {
        let (reply, rx) = oneshot::channel();
        if self
            .sender
            .send(SystemStatusCommand::Get { reply })
            .await
            .is_err()
        {
            return SystemStatus::default();
        }
        rx.await.unwrap_or_default()
    }

    /// 健康检查
    /// 返回true表示Actor正常运行，false表示Actor无响应或已停止
    pub async fn health_check(&self) -> bool {
        let (reply, rx) = oneshot::channel();

        if self
            .sender
            .send(SystemStatusCommand::HealthCheck { reply })
            .await
            .is_err()
        {
            tracing::warn!("System Status Actor 健康检查失败: 通道已关闭");
            return false;
        }

        match tokio::time::timeout(std::time::Duration::from_secs(5), rx).await {
            Ok(Ok(())) => true,
            _ => {
                tracing::warn!("System Status Actor 健康检查失败");
                false
            }
        }
    }
}
