// 分析领域管理器
//
// 负责成分提取、分析调用与响应文本解析
// 使用Actor模式管理LLM状态，消除锁竞争；解释器是纯函数，可安全共享

use crate::actors::LLMHandle;
use crate::analysis::{Interpreter, ZeroMatchPolicy};
use std::sync::Arc;

/// 分析领域管理器 - 负责 LLM 调用与分析文本解析
#[derive(Clone)]
pub struct AnalysisDomain {
    llm_handle: LLMHandle,
    /// 默认策略：零匹配仅告警
    interpreter: Arc<Interpreter>,
    /// 严格策略：零匹配按错误处理（由设置开关选择）
    strict_interpreter: Arc<Interpreter>,
}

impl AnalysisDomain {
    /// 创建新的分析领域管理器
    pub fn new(llm_handle: LLMHandle) -> Self {
        Self {
            llm_handle,
            interpreter: Arc::new(Interpreter::new(ZeroMatchPolicy::Warn)),
            strict_interpreter: Arc::new(Interpreter::new(ZeroMatchPolicy::Error)),
        }
    }

    /// 获取 LLM Handle
    pub fn get_llm_handle(&self) -> &LLMHandle {
        &self.llm_handle
    }

    /// 按严格解析开关选择解释器
    pub fn interpreter_for(&self, strict: bool) -> &Arc<Interpreter> {
        if strict {
            &self.strict_interpreter
        } else {
            &self.interpreter
        }
    }
}
