//! アプリケーションコンテキスト
//!
//! カタログ・発注モデル・ナビゲーショングリッド・選択中の店舗を1つにまとめ、
//! 各コマンドはこれを受け取って処理する。

use crate::batch::{BatchProgress, CancelFlag};
use crate::catalog::{self, Site};
use crate::config::Config;
use crate::device::LabelDevice;
use crate::error::{LabelError, Result};
use crate::grid::{Address, Direction, NavigationGrid};
use crate::order::{Category, EntryId, LabelEntry, OrderModel, SiteId};
use crate::price::{PriceService, PriceUpdate};
use crate::printer::{PrintJobRunner, PrintOutcome};
use crate::template::{DaySelector, PopulateSummary, TemplateSource};
use std::path::{Path, PathBuf};

pub struct AppContext {
    config: Config,
    root: PathBuf,
    sites: Vec<Site>,
    model: OrderModel,
    grid: NavigationGrid,
    prices: PriceService,
    templates: TemplateSource,
    active: Option<SiteId>,
    displayed_price: String,
}

impl AppContext {
    /// ルートフォルダを走査してコンテキストを構築
    pub fn load(config: Config, root: &Path) -> Result<Self> {
        let sites = catalog::discover(root, &config)?;

        let mut model = OrderModel::new();
        let mut grid = NavigationGrid::new();
        catalog::register_sites(&sites, &mut model, &mut grid);

        let prices = PriceService::from_config(&config);
        let templates = TemplateSource::new(
            config.main_template_path(root),
            config.other_template_path(root),
        );
        let displayed_price = prices.no_price_text().to_string();

        Ok(Self {
            config,
            root: root.to_path_buf(),
            sites,
            model,
            grid,
            prices,
            templates,
            active: None,
            displayed_price,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    pub fn model(&self) -> &OrderModel {
        &self.model
    }

    pub fn grid(&self) -> &NavigationGrid {
        &self.grid
    }

    pub fn templates(&self) -> &TemplateSource {
        &self.templates
    }

    pub fn active_site(&self) -> Option<&SiteId> {
        self.active.as_ref()
    }

    pub fn displayed_price(&self) -> &str {
        &self.displayed_price
    }

    /// 店舗を選択（タブ切り替え相当）
    pub fn select_site(&mut self, name: &str) -> Result<&Site> {
        let site = self
            .sites
            .iter()
            .find(|s| s.id.as_str() == name)
            .ok_or_else(|| LabelError::UnknownSite(name.to_string()))?;

        self.active = Some(site.id.clone());
        self.displayed_price = self.prices.no_price_text().to_string();
        Ok(site)
    }

    fn require_site(&self) -> Result<SiteId> {
        self.active.clone().ok_or(LabelError::NoSiteSelected)
    }

    /// 選択中店舗の表示価格を再読込
    pub fn refresh_price<D: LabelDevice + ?Sized>(&mut self, device: &mut D) -> Result<&str> {
        let site = self.require_site()?;
        self.displayed_price = self.prices.read_price(device, &self.model, &site);
        Ok(&self.displayed_price)
    }

    /// 選択中店舗の合計枚数
    pub fn total(&self) -> Result<u64> {
        Ok(self.model.total_for(&self.require_site()?))
    }

    /// 枚数を設定して店舗合計を返す
    pub fn set_quantity(&mut self, id: &EntryId, raw_input: &str) -> Result<u64> {
        if !self.model.set_quantity(id, raw_input) {
            return Err(LabelError::UnknownLabel(id.to_string()));
        }
        Ok(self.model.total_for(&id.site))
    }

    /// "category/label=copies" 形式で枚数を設定
    pub fn apply_quantity_spec(&mut self, spec: &str) -> Result<u64> {
        let site = self.require_site()?;
        let invalid = || LabelError::InvalidQuantitySpec(spec.to_string());

        let (target, raw) = spec.split_once('=').ok_or_else(invalid)?;
        let (category, label) = target.split_once('/').ok_or_else(invalid)?;
        let category: Category = category.parse().map_err(|_| invalid())?;

        let id = EntryId::new(site, category, label.trim());
        self.set_quantity(&id, raw)
    }

    /// 曜日テンプレートから発注数を一括設定
    ///
    /// 曜日は主店舗のみ、Reset は全店舗で使える。
    pub fn populate(&mut self, day: DaySelector) -> Result<PopulateSummary> {
        let site = self.require_site()?;

        if !day.is_reset() && !self.config.is_primary_site(site.as_str()) {
            return Err(LabelError::DayNotAllowed {
                day: day.to_string(),
                site: site.to_string(),
            });
        }

        self.templates.populate(&mut self.model, &site, day)
    }

    /// 選択中店舗のグリッド上で移動
    pub fn move_focus(
        &self,
        row: usize,
        col: usize,
        direction: Direction,
    ) -> Option<(Address, &LabelEntry)> {
        let site = self.active.as_ref()?;
        let (address, id) = self.grid.step(site, row, col, direction)?;
        Some((address, self.model.get(id)?))
    }

    /// white/brown の価格を一括更新し、表示価格を保存値から再読込
    pub fn set_price<D, F>(
        &mut self,
        device: &mut D,
        input: &str,
        cancel: &CancelFlag,
        on_progress: F,
    ) -> Result<PriceUpdate>
    where
        D: LabelDevice + ?Sized,
        F: FnMut(BatchProgress),
    {
        let site = self.require_site()?;
        let update = self
            .prices
            .set_price(device, &self.model, &site, input, cancel, on_progress)?;

        if let PriceUpdate::Completed(report) = &update {
            self.displayed_price = report.displayed.clone();
        }
        Ok(update)
    }

    /// 枚数 > 0 のラベルを1ジョブで印刷
    pub fn print<D, F>(
        &mut self,
        device: &mut D,
        cancel: &CancelFlag,
        on_progress: F,
    ) -> Result<PrintOutcome>
    where
        D: LabelDevice + ?Sized,
        F: FnMut(BatchProgress),
    {
        let site = self.require_site()?;
        let selection = self.model.print_selection(&site);
        PrintJobRunner::new().run(device, &selection, cancel, on_progress)
    }
}
