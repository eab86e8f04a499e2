//! # ルートテーブル
//!
//! `{method, path, handler}` の組を登録順に保持する静的なテーブル。
//! 登録が完了した時点でエンジン（`axum::Router`）に変換する。

use axum::{
    handler::Handler,
    http::Method,
    routing::{MethodFilter, MethodRouter, on},
};

use super::RouterError;

/// テーブルの 1 エントリ
#[derive(Debug)]
pub struct RouteEntry {
    method:  Method,
    path:    String,
    handler: MethodRouter,
}

impl RouteEntry {
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

/// 登録済みルートの一覧
///
/// 同じメソッドとパスの組は重複登録できない。
#[derive(Debug, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// パスのプレフィックスを共有するグループを作る
    pub fn group(&mut self, prefix: &str) -> RouteGroup<'_> {
        RouteGroup {
            prefix: prefix.trim_end_matches('/').to_string(),
            table:  self,
        }
    }

    fn insert(
        &mut self,
        method: Method,
        path: String,
        handler: MethodRouter,
    ) -> Result<(), RouterError> {
        if self.contains(&method, &path) {
            return Err(RouterError::DuplicateRoute { method, path });
        }
        self.entries.push(RouteEntry {
            method,
            path,
            handler,
        });
        Ok(())
    }

    pub fn contains(&self, method: &Method, path: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.method == *method && entry.path == path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RouteEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// テーブルの内容をエンジンに変換する
    ///
    /// 同一パスに複数メソッドがある場合は 1 つの `MethodRouter` にまとめる
    /// （axum は同じパスへの `route` の重複呼び出しを許さない）。
    pub(super) fn build(&self, engine: axum::Router) -> axum::Router {
        let mut merged: Vec<(&str, MethodRouter)> = Vec::new();
        for entry in &self.entries {
            match merged.iter_mut().find(|(path, _)| *path == entry.path) {
                Some((_, router)) => {
                    *router = std::mem::take(router).merge(entry.handler.clone());
                }
                None => merged.push((entry.path.as_str(), entry.handler.clone())),
            }
        }

        merged
            .into_iter()
            .fold(engine, |engine, (path, handler)| engine.route(path, handler))
    }
}

/// 共通プレフィックス配下にルートを登録するためのビュー
pub struct RouteGroup<'a> {
    prefix: String,
    table:  &'a mut RouteTable,
}

impl RouteGroup<'_> {
    /// `GET` ルートを登録する
    pub fn get<H, T>(&mut self, path: &str, handler: H) -> Result<&mut Self, RouterError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        self.route(Method::GET, path, handler)
    }

    /// 任意のメソッドでルートを登録する
    pub fn route<H, T>(
        &mut self,
        method: Method,
        path: &str,
        handler: H,
    ) -> Result<&mut Self, RouterError>
    where
        H: Handler<T, ()>,
        T: 'static,
    {
        let filter: MethodFilter = method
            .clone()
            .try_into()
            .map_err(|_| RouterError::UnsupportedMethod(method.clone()))?;
        let full_path = format!("{}{}", self.prefix, path);
        self.table.insert(method, full_path, on(filter, handler))?;
        Ok(self)
    }
}
